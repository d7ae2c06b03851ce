//! Ports for the two external stores the synchronization layer talks to.
//!
//! Both stores are collaborators owned elsewhere; this crate only fixes
//! their boundary so the controller can be tested against in-memory fakes.

use crate::nodeclaim::NodeClaim;
use crate::shared_kernel::{NodeClaimName, Result};
use async_trait::async_trait;

/// Read boundary of the authoritative, eventually-consistent resource store.
///
/// `get` answers with the current claim, [`DomainError::NodeClaimNotFound`]
/// when the record is absent (the only deletion signal in the system), or
/// [`DomainError::StoreUnavailable`] for any other failure.
///
/// [`DomainError::NodeClaimNotFound`]: crate::shared_kernel::DomainError::NodeClaimNotFound
/// [`DomainError::StoreUnavailable`]: crate::shared_kernel::DomainError::StoreUnavailable
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn get(&self, name: &NodeClaimName) -> Result<NodeClaim>;
}

/// Write boundary of the cluster-state cache consumed by the downstream
/// scheduler.
///
/// Both operations are idempotent: applying the same `upsert` twice leaves
/// the cache observably identical, and deleting an absent key is a no-op.
/// Implementations must be safe under concurrent calls for different keys.
#[async_trait]
pub trait ClusterStateStore: Send + Sync {
    async fn upsert(&self, claim: NodeClaim) -> Result<()>;

    async fn delete_by_name(&self, name: &NodeClaimName) -> Result<()>;
}
