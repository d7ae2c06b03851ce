use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Upper bound on `spec.requirements`.
pub const MAX_REQUIREMENTS: usize = 100;

/// Valid range for `minValues`.
pub(crate) const MIN_VALUES_FLOOR: u32 = 1;
pub(crate) const MIN_VALUES_CEILING: u32 = 50;

/// One constraint on the shape of an acceptable node.
///
/// `min_values` is a flexibility floor: at least that many distinct entries
/// of `values` must be usable to satisfy the requirement. It is consumed by
/// downstream matching logic through cardinality, not equality, and is only
/// meaningful for the `In` operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub key: String,
    pub operator: RequirementOperator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_values: Option<u32>,
}

impl Requirement {
    pub fn new(key: impl Into<String>, operator: RequirementOperator, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            operator,
            values,
            min_values: None,
        }
    }

    pub fn with_min_values(mut self, min_values: u32) -> Self {
        self.min_values = Some(min_values);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RequirementOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
    Gt,
    Lt,
}

impl RequirementOperator {
    /// Gt and Lt compare against a single non-negative integer value.
    pub fn is_numeric_comparison(&self) -> bool {
        matches!(self, RequirementOperator::Gt | RequirementOperator::Lt)
    }
}

impl std::fmt::Display for RequirementOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::In => "In",
            Self::NotIn => "NotIn",
            Self::Exists => "Exists",
            Self::DoesNotExist => "DoesNotExist",
            Self::Gt => "Gt",
            Self::Lt => "Lt",
        };
        write!(f, "{s}")
    }
}
