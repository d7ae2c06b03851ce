//! The per-key reconciliation cycle.
//!
//! One cycle translates the authoritative store's answer for a single name
//! into an idempotent cache operation: a fetched claim is upserted, an
//! explicit not-found is mirrored as a deletion, and every other failure is
//! propagated untouched so the scheduling layer retries it. The cache is
//! never mutated on a failed fetch; stale data is preferred over a false
//! deletion.

use claimstate_domain::{ClusterStateStore, NodeClaimName, ResourceStore, Result};
use std::sync::Arc;
use tracing::{debug, info};

const LOG_TARGET: &str = "claimstate::sync";

/// What a successful cycle did to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The claim exists upstream and was (re-)applied to the cache.
    /// Re-applying an unchanged claim is a no-op by the upsert contract.
    Upserted,
    /// The record is absent upstream; the key was removed from the cache.
    Deleted,
}

/// Keeps the cluster-state cache consistent with the resource store for the
/// claims it is asked about. Holds no state of its own.
pub struct NodeClaimSyncController {
    resource_store: Arc<dyn ResourceStore>,
    cluster: Arc<dyn ClusterStateStore>,
}

impl NodeClaimSyncController {
    pub fn new(
        resource_store: Arc<dyn ResourceStore>,
        cluster: Arc<dyn ClusterStateStore>,
    ) -> Self {
        Self {
            resource_store,
            cluster,
        }
    }

    /// Runs one reconciliation cycle for `name`.
    ///
    /// Not-found upstream is the only deletion signal and is not surfaced as
    /// an error; any other fetch failure is returned unresolved with the
    /// cache left at its last known-good value.
    pub async fn reconcile(&self, name: &NodeClaimName) -> Result<ReconcileOutcome> {
        let claim = match self.resource_store.get(name).await {
            Ok(claim) => claim,
            Err(err) if err.is_not_found() => {
                info!(target: LOG_TARGET, nodeclaim = %name, "claim absent upstream, removing from cluster state");
                self.cluster.delete_by_name(name).await?;
                return Ok(ReconcileOutcome::Deleted);
            }
            Err(err) => return Err(err),
        };

        self.cluster.upsert(claim).await?;
        debug!(target: LOG_TARGET, nodeclaim = %name, "claim synced into cluster state");
        Ok(ReconcileOutcome::Upserted)
    }
}

impl std::fmt::Debug for NodeClaimSyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClaimSyncController").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use claimstate_domain::{DomainError, NodeClaim};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Resource store that always answers with the same error.
    struct FailingStore {
        not_found: bool,
        gets: AtomicUsize,
    }

    #[async_trait]
    impl ResourceStore for FailingStore {
        async fn get(&self, name: &NodeClaimName) -> Result<NodeClaim> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.not_found {
                Err(DomainError::NodeClaimNotFound { name: name.clone() })
            } else {
                Err(DomainError::StoreUnavailable {
                    message: "connection refused".to_string(),
                })
            }
        }
    }

    /// Cluster state that records how it was called.
    #[derive(Default)]
    struct RecordingCluster {
        upserts: AtomicUsize,
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl ClusterStateStore for RecordingCluster {
        async fn upsert(&self, _claim: NodeClaim) -> Result<()> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete_by_name(&self, _name: &NodeClaimName) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn not_found_is_mirrored_as_deletion_exactly_once() {
        let cluster = Arc::new(RecordingCluster::default());
        let controller = NodeClaimSyncController::new(
            Arc::new(FailingStore {
                not_found: true,
                gets: AtomicUsize::new(0),
            }),
            cluster.clone(),
        );

        let outcome = controller.reconcile(&"ng-1".into()).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Deleted);
        assert_eq!(cluster.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(cluster.upserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transient_failure_propagates_without_cache_mutation() {
        let cluster = Arc::new(RecordingCluster::default());
        let controller = NodeClaimSyncController::new(
            Arc::new(FailingStore {
                not_found: false,
                gets: AtomicUsize::new(0),
            }),
            cluster.clone(),
        );

        let err = controller.reconcile(&"ng-1".into()).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(cluster.deletes.load(Ordering::SeqCst), 0);
        assert_eq!(cluster.upserts.load(Ordering::SeqCst), 0);
    }
}
