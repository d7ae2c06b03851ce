//! Declarative constraint expressions for the NodeClaim schema.
//!
//! The authoritative resource store enforces validation at its own write
//! boundary with CEL-style expressions attached to the schema. The rules
//! below are the single source for that attachment; they encode exactly the
//! predicates of [`crate::nodeclaim::validate_spec`] so the two layers cannot
//! drift. Tests feed both layers the same vectors.

use crate::nodeclaim::validation;

/// One constraint expression plus the message surfaced when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRule {
    /// Field path the rule is attached to.
    pub path: &'static str,
    /// CEL expression evaluated against the field by the store's schema layer.
    pub rule: &'static str,
    /// Stable, human-readable failure message.
    pub message: &'static str,
}

/// Rules attached to `spec.requirements`.
pub const REQUIREMENT_RULES: [ValidationRule; 4] = [
    ValidationRule {
        path: "spec.requirements",
        rule: "self.all(x, x.operator == 'In' ? x.values.size() != 0 : true)",
        message: validation::MSG_IN_NEEDS_VALUES,
    },
    ValidationRule {
        path: "spec.requirements",
        rule: "self.all(x, (x.operator == 'Gt' || x.operator == 'Lt') ? \
               (x.values.size() == 1 && int(x.values[0]) >= 0) : true)",
        message: validation::MSG_GT_LT_SINGLE_INTEGER,
    },
    ValidationRule {
        path: "spec.requirements",
        rule: "self.all(x, has(x.minValues) ? x.operator == 'In' : true)",
        message: validation::MSG_MIN_VALUES_OPERATOR,
    },
    ValidationRule {
        path: "spec.requirements",
        rule: "self.all(x, (x.operator == 'In' && has(x.minValues)) ? \
               x.values.size() >= x.minValues : true)",
        message: validation::MSG_MIN_VALUES_CARDINALITY,
    },
];

/// Rule enforcing spec immutability after the first successful write.
pub const SPEC_IMMUTABLE_RULE: ValidationRule = ValidationRule {
    path: "spec",
    rule: "self == oldSelf",
    message: "spec is immutable",
};

pub fn validation_rules() -> &'static [ValidationRule] {
    &REQUIREMENT_RULES
}
