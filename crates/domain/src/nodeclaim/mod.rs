// NodeClaim Domain - Entities for node capacity claims

mod requirements;
pub(crate) mod validation;

pub use requirements::{Requirement, RequirementOperator, MAX_REQUIREMENTS};
pub use validation::validate_spec;

use crate::shared_kernel::{NodeClaimName, Result};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request for one node with a specific shape.
///
/// The `spec` is immutable after creation; `status` is written only by the
/// provisioning/lifecycle collaborator. The synchronization controller never
/// creates, mutates or deletes a claim, it only mirrors it into the
/// cluster-state cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeClaim {
    pub name: NodeClaimName,
    pub spec: NodeClaimSpec,
    #[serde(default)]
    pub status: NodeClaimStatus,
}

impl NodeClaim {
    /// Builds a claim with a validated spec. Rejects the whole claim on the
    /// first violated rule, nothing is partially applied.
    pub fn new(name: impl Into<NodeClaimName>, spec: NodeClaimSpec) -> Result<Self> {
        validate_spec(&spec)?;
        Ok(Self {
            name: name.into(),
            spec,
            status: NodeClaimStatus::default(),
        })
    }

    pub fn name(&self) -> &NodeClaimName {
        &self.name
    }

    /// Whether the claim's Ready condition is currently true.
    pub fn is_ready(&self) -> bool {
        self.status
            .condition(Condition::READY)
            .map(|c| c.status == ConditionStatus::True)
            .unwrap_or(false)
    }
}

/// Desired state of a NodeClaim. Deep equality on this type is the
/// immutability check: an update whose spec differs from the stored one is
/// rejected regardless of which field changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeClaimSpec {
    /// Taints applied to the resulting node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,
    /// Taints applied on startup and removed by an external initialization
    /// process. Advisory only: excluded from requirement-satisfaction checks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub startup_taints: Vec<Taint>,
    /// Acceptable node shapes, at most [`MAX_REQUIREMENTS`] entries.
    pub requirements: Vec<Requirement>,
    /// Minimum capacity the claim needs.
    #[serde(default)]
    pub resources: ResourceRequirements,
    /// Reference to the provider-specific configuration object. Denoted,
    /// never dereferenced here.
    pub node_class_ref: NodeClassReference,
}

/// A (key, value, effect) triple applied to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Taint {
    pub key: String,
    #[serde(default)]
    pub value: String,
    pub effect: TaintEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TaintEffect {
    NoSchedule,
    PreferNoSchedule,
    NoExecute,
}

/// Non-negative amount of a named resource.
pub type Quantity = f64;

/// Minimum resources required for the claim to launch. Aggregation across
/// claims is a downstream scheduler concern and does not live here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirements {
    /// Resource name (e.g. "cpu", "memory") to quantity.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: BTreeMap<String, Quantity>,
}

/// Reference to an external provider-specific configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeClassReference {
    pub group: String,
    pub kind: String,
    pub name: String,
}

/// Observed state, written only by the provisioning/lifecycle collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeClaimStatus {
    /// Name of the node the claim is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    /// Cloud-provider identifier of the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl NodeClaimStatus {
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
    }

    /// Inserts or replaces a condition, stamping the transition time when the
    /// status actually changes.
    pub fn set_condition(&mut self, condition_type: impl Into<String>, status: ConditionStatus) {
        let condition_type = condition_type.into();
        match self
            .conditions
            .iter_mut()
            .find(|c| c.condition_type == condition_type)
        {
            Some(existing) => {
                if existing.status != status {
                    existing.status = status;
                    existing.last_transition_time = Utc::now();
                }
            }
            None => self.conditions.push(Condition {
                condition_type,
                status,
                last_transition_time: Utc::now(),
                reason: None,
                message: None,
            }),
        }
    }
}

/// A timestamped observation about the claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: ConditionStatus,
    pub last_transition_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    pub const READY: &'static str = "Ready";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}
