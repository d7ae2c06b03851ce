//! In-memory cluster-state cache.
//!
//! The cache the downstream scheduler reads from. Keyed by claim name,
//! guarded by a single `RwLock`; upsert and delete are idempotent and safe
//! under concurrent calls for different keys.

use async_trait::async_trait;
use claimstate_domain::{ClusterStateStore, NodeClaim, NodeClaimName, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryClusterState {
    claims: Arc<RwLock<HashMap<NodeClaimName, NodeClaim>>>,
}

impl InMemoryClusterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &NodeClaimName) -> Option<NodeClaim> {
        let claims = self.claims.read().await;
        claims.get(name).cloned()
    }

    pub async fn contains(&self, name: &NodeClaimName) -> bool {
        let claims = self.claims.read().await;
        claims.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        let claims = self.claims.read().await;
        claims.len()
    }

    pub async fn is_empty(&self) -> bool {
        let claims = self.claims.read().await;
        claims.is_empty()
    }

    pub async fn names(&self) -> Vec<NodeClaimName> {
        let claims = self.claims.read().await;
        claims.keys().cloned().collect()
    }
}

#[async_trait]
impl ClusterStateStore for InMemoryClusterState {
    async fn upsert(&self, claim: NodeClaim) -> Result<()> {
        let mut claims = self.claims.write().await;
        claims.insert(claim.name().clone(), claim);
        Ok(())
    }

    async fn delete_by_name(&self, name: &NodeClaimName) -> Result<()> {
        let mut claims = self.claims.write().await;
        claims.remove(name);
        Ok(())
    }
}
