//! In-memory resource store adapter.
//!
//! Stands in for the authoritative declarative store in tests and local
//! runs. It implements the full write boundary the real store exposes:
//! every write re-validates the spec, updates enforce spec immutability by
//! deep equality, `status` has its own sole-writer path for the lifecycle
//! collaborator, and every successful write publishes the affected name so
//! a worker pool can react. Delivery through the broadcast channel is
//! at-least-once from the consumer's perspective; the controller does not
//! rely on ordering.

use async_trait::async_trait;
use claimstate_domain::{
    validate_spec, DomainError, NodeClaim, NodeClaimName, NodeClaimStatus, ResourceStore, Result,
};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio_stream::wrappers::BroadcastStream;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct InMemoryResourceStore {
    claims: Arc<RwLock<HashMap<NodeClaimName, NodeClaim>>>,
    events: broadcast::Sender<NodeClaimName>,
    unavailable: Arc<AtomicBool>,
}

impl Default for InMemoryResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            claims: Arc::new(RwLock::new(HashMap::new())),
            events,
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stream of names whose records changed. Lagged receivers silently drop
    /// events, which the periodic resync is designed to absorb.
    pub fn watch(&self) -> BoxStream<'static, NodeClaimName> {
        BroadcastStream::new(self.events.subscribe())
            .filter_map(|event| async move { event.ok() })
            .boxed()
    }

    /// Fault injection: while set, every fetch fails with a transient error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Accepts a new claim after validating its spec.
    pub async fn create(&self, claim: NodeClaim) -> Result<()> {
        validate_spec(&claim.spec)?;
        let mut claims = self.claims.write().await;
        if claims.contains_key(claim.name()) {
            return Err(DomainError::NodeClaimAlreadyExists {
                name: claim.name().clone(),
            });
        }
        let name = claim.name().clone();
        claims.insert(name.clone(), claim);
        drop(claims);
        self.notify(name);
        Ok(())
    }

    /// Replaces a stored claim. The proposed spec must be deep-equal to the
    /// stored one; any difference is rejected atomically, independent of
    /// which field changed.
    pub async fn update(&self, claim: NodeClaim) -> Result<()> {
        validate_spec(&claim.spec)?;
        let mut claims = self.claims.write().await;
        let stored = claims
            .get(claim.name())
            .ok_or_else(|| DomainError::NodeClaimNotFound {
                name: claim.name().clone(),
            })?;
        if stored.spec != claim.spec {
            return Err(DomainError::ImmutableNodeClaimSpec {
                name: claim.name().clone(),
            });
        }
        let name = claim.name().clone();
        claims.insert(name.clone(), claim);
        drop(claims);
        self.notify(name);
        Ok(())
    }

    /// Sole-writer path for the provisioning/lifecycle collaborator.
    pub async fn update_status(&self, name: &NodeClaimName, status: NodeClaimStatus) -> Result<()> {
        let mut claims = self.claims.write().await;
        let claim = claims
            .get_mut(name)
            .ok_or_else(|| DomainError::NodeClaimNotFound { name: name.clone() })?;
        claim.status = status;
        drop(claims);
        self.notify(name.clone());
        Ok(())
    }

    /// Removes a claim. Idempotent; deleting an absent name still notifies
    /// so observers re-check and converge.
    pub async fn delete(&self, name: &NodeClaimName) -> Result<()> {
        let mut claims = self.claims.write().await;
        claims.remove(name);
        drop(claims);
        self.notify(name.clone());
        Ok(())
    }

    pub async fn contains(&self, name: &NodeClaimName) -> bool {
        let claims = self.claims.read().await;
        claims.contains_key(name)
    }

    fn notify(&self, name: NodeClaimName) {
        // Send only fails when nobody subscribed, which is fine.
        let _ = self.events.send(name);
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn get(&self, name: &NodeClaimName) -> Result<NodeClaim> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable {
                message: "resource store marked unavailable".to_string(),
            });
        }
        let claims = self.claims.read().await;
        claims
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::NodeClaimNotFound { name: name.clone() })
    }
}
