use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identity of a node claim. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct NodeClaimName(pub String);

impl NodeClaimName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeClaimName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeClaimName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for NodeClaimName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Errores del dominio
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("Node claim not found: {name}")]
    NodeClaimNotFound { name: NodeClaimName },

    #[error("Node claim already exists: {name}")]
    NodeClaimAlreadyExists { name: NodeClaimName },

    #[error("Invalid node claim spec field {field}: {reason}")]
    InvalidNodeClaimSpec { field: String, reason: String },

    #[error("Node claim {name} spec is immutable")]
    ImmutableNodeClaimSpec { name: NodeClaimName },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },
}

impl DomainError {
    /// Whether this error is the authoritative-deletion signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NodeClaimNotFound { .. })
    }

    /// Whether a retry can succeed without a corrected payload.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::StoreUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
