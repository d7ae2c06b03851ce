//! Write-time validation for [`NodeClaimSpec`].
//!
//! These predicates are pure and evaluated on every create/update attempt,
//! independent of whatever schema-enforcement layer the authoritative store
//! provides. The same rules are published as declarative constraint
//! expressions in [`crate::schema`]; both copies must stay behaviorally
//! identical (see the shared vectors in the tests below).

use super::requirements::{MIN_VALUES_CEILING, MIN_VALUES_FLOOR};
use super::{NodeClaimSpec, RequirementOperator, MAX_REQUIREMENTS};
use crate::shared_kernel::{DomainError, Result};

pub(crate) const MSG_IN_NEEDS_VALUES: &str =
    "requirements with operator 'In' must have a value defined";
pub(crate) const MSG_GT_LT_SINGLE_INTEGER: &str =
    "requirements operator 'Gt' or 'Lt' must have a single positive integer value";
pub(crate) const MSG_MIN_VALUES_CARDINALITY: &str =
    "requirements with 'minValues' must have at least that many values specified in the 'values' field";
pub(crate) const MSG_MIN_VALUES_RANGE: &str = "minValues must be between 1 and 50";
pub(crate) const MSG_MIN_VALUES_OPERATOR: &str =
    "minValues is only supported for requirements with operator 'In'";
pub(crate) const MSG_TOO_MANY_REQUIREMENTS: &str = "must have at most 100 requirements";
pub(crate) const MSG_NEGATIVE_REQUEST: &str = "resource requests must be non-negative quantities";
pub(crate) const MSG_NODE_CLASS_REF_REQUIRED: &str =
    "nodeClassRef group, kind and name are required";

/// Checks every invariant of the spec and returns the first violated rule.
///
/// Rules are evaluated in a fixed order (requirement list bound, then each
/// requirement in sequence, then resource requests, then the node class
/// reference) so that rejection messages are deterministic.
pub fn validate_spec(spec: &NodeClaimSpec) -> Result<()> {
    if spec.requirements.len() > MAX_REQUIREMENTS {
        return Err(invalid("spec.requirements", MSG_TOO_MANY_REQUIREMENTS));
    }

    for (i, requirement) in spec.requirements.iter().enumerate() {
        let field = format!("spec.requirements[{i}]");

        if requirement.operator == RequirementOperator::In && requirement.values.is_empty() {
            return Err(invalid(field, MSG_IN_NEEDS_VALUES));
        }

        if requirement.operator.is_numeric_comparison()
            && !has_single_non_negative_integer(&requirement.values)
        {
            return Err(invalid(field, MSG_GT_LT_SINGLE_INTEGER));
        }

        if let Some(min_values) = requirement.min_values {
            if !(MIN_VALUES_FLOOR..=MIN_VALUES_CEILING).contains(&min_values) {
                return Err(invalid(field, MSG_MIN_VALUES_RANGE));
            }
            if requirement.operator != RequirementOperator::In {
                return Err(invalid(field, MSG_MIN_VALUES_OPERATOR));
            }
            if requirement.values.len() < min_values as usize {
                return Err(invalid(field, MSG_MIN_VALUES_CARDINALITY));
            }
        }
    }

    for (resource, quantity) in &spec.resources.requests {
        if !quantity.is_finite() || *quantity < 0.0 {
            return Err(invalid(
                format!("spec.resources.requests.{resource}"),
                MSG_NEGATIVE_REQUEST,
            ));
        }
    }

    let node_class_ref = &spec.node_class_ref;
    if node_class_ref.group.is_empty()
        || node_class_ref.kind.is_empty()
        || node_class_ref.name.is_empty()
    {
        return Err(invalid("spec.nodeClassRef", MSG_NODE_CLASS_REF_REQUIRED));
    }

    Ok(())
}

fn has_single_non_negative_integer(values: &[String]) -> bool {
    match values {
        [value] => value.parse::<i64>().map(|v| v >= 0).unwrap_or(false),
        _ => false,
    }
}

fn invalid(field: impl Into<String>, reason: &str) -> DomainError {
    DomainError::InvalidNodeClaimSpec {
        field: field.into(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodeclaim::{NodeClassReference, Requirement, ResourceRequirements};

    fn spec_with(requirements: Vec<Requirement>) -> NodeClaimSpec {
        NodeClaimSpec {
            taints: vec![],
            startup_taints: vec![],
            requirements,
            resources: ResourceRequirements::default(),
            node_class_ref: NodeClassReference {
                group: "provider.sh".to_string(),
                kind: "NodeClass".to_string(),
                name: "default".to_string(),
            },
        }
    }

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|v| v.to_string()).collect()
    }

    fn reason(err: DomainError) -> String {
        match err {
            DomainError::InvalidNodeClaimSpec { reason, .. } => reason,
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn in_operator_requires_values() {
        let spec = spec_with(vec![Requirement::new(
            "zone",
            RequirementOperator::In,
            vec![],
        )]);
        assert_eq!(
            reason(validate_spec(&spec).unwrap_err()),
            MSG_IN_NEEDS_VALUES
        );

        let spec = spec_with(vec![Requirement::new(
            "zone",
            RequirementOperator::In,
            values(&["a"]),
        )]);
        assert!(validate_spec(&spec).is_ok());
    }

    #[test]
    fn not_in_allows_empty_values() {
        let spec = spec_with(vec![Requirement::new(
            "zone",
            RequirementOperator::NotIn,
            vec![],
        )]);
        assert!(validate_spec(&spec).is_ok());
    }

    #[test]
    fn gt_lt_require_single_non_negative_integer() {
        for operator in [RequirementOperator::Gt, RequirementOperator::Lt] {
            let ok = spec_with(vec![Requirement::new("cpu", operator, values(&["4"]))]);
            assert!(validate_spec(&ok).is_ok());

            let zero = spec_with(vec![Requirement::new("cpu", operator, values(&["0"]))]);
            assert!(validate_spec(&zero).is_ok());

            for bad_values in [
                vec![],
                values(&["4", "8"]),
                values(&["-1"]),
                values(&["four"]),
                values(&["4.5"]),
            ] {
                let bad = spec_with(vec![Requirement::new("cpu", operator, bad_values)]);
                assert_eq!(
                    reason(validate_spec(&bad).unwrap_err()),
                    MSG_GT_LT_SINGLE_INTEGER
                );
            }
        }
    }

    #[test]
    fn min_values_is_a_flexibility_floor() {
        // ng-1 scenario: two zones with minValues 2 is satisfiable.
        let ok = spec_with(vec![Requirement::new(
            "zone",
            RequirementOperator::In,
            values(&["a", "b"]),
        )
        .with_min_values(2)]);
        assert!(validate_spec(&ok).is_ok());

        // Same requirement with minValues 3 demands more flexibility than
        // the values can provide.
        let too_strict = spec_with(vec![Requirement::new(
            "zone",
            RequirementOperator::In,
            values(&["a", "b"]),
        )
        .with_min_values(3)]);
        assert_eq!(
            reason(validate_spec(&too_strict).unwrap_err()),
            MSG_MIN_VALUES_CARDINALITY
        );
    }

    #[test]
    fn min_values_requires_in_operator() {
        let spec = spec_with(vec![Requirement::new(
            "zone",
            RequirementOperator::NotIn,
            values(&["a", "b"]),
        )
        .with_min_values(1)]);
        assert_eq!(
            reason(validate_spec(&spec).unwrap_err()),
            MSG_MIN_VALUES_OPERATOR
        );
    }

    #[test]
    fn min_values_range_is_bounded() {
        for out_of_range in [0u32, 51] {
            let spec = spec_with(vec![Requirement::new(
                "zone",
                RequirementOperator::In,
                values(&["a"]),
            )
            .with_min_values(out_of_range)]);
            assert_eq!(
                reason(validate_spec(&spec).unwrap_err()),
                MSG_MIN_VALUES_RANGE
            );
        }
    }

    #[test]
    fn requirement_count_is_bounded() {
        let many = (0..=MAX_REQUIREMENTS)
            .map(|i| Requirement::new(format!("key-{i}"), RequirementOperator::Exists, vec![]))
            .collect();
        assert_eq!(
            reason(validate_spec(&spec_with(many)).unwrap_err()),
            MSG_TOO_MANY_REQUIREMENTS
        );
    }

    #[test]
    fn resource_requests_must_be_non_negative() {
        let mut spec = spec_with(vec![Requirement::new(
            "zone",
            RequirementOperator::In,
            values(&["a"]),
        )]);
        spec.resources.requests.insert("cpu".to_string(), 2.0);
        assert!(validate_spec(&spec).is_ok());

        spec.resources.requests.insert("memory".to_string(), -1.0);
        assert_eq!(
            reason(validate_spec(&spec).unwrap_err()),
            MSG_NEGATIVE_REQUEST
        );
    }

    #[test]
    fn node_class_ref_must_be_complete() {
        let mut spec = spec_with(vec![Requirement::new(
            "zone",
            RequirementOperator::In,
            values(&["a"]),
        )]);
        spec.node_class_ref.kind = String::new();
        assert_eq!(
            reason(validate_spec(&spec).unwrap_err()),
            MSG_NODE_CLASS_REF_REQUIRED
        );
    }

    #[test]
    fn first_violation_wins() {
        // Both requirements are invalid; the earlier one decides the error.
        let spec = spec_with(vec![
            Requirement::new("zone", RequirementOperator::In, vec![]),
            Requirement::new("cpu", RequirementOperator::Gt, vec![]),
        ]);
        assert_eq!(
            reason(validate_spec(&spec).unwrap_err()),
            MSG_IN_NEEDS_VALUES
        );
    }
}
