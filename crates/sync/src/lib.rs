//! Cluster-state synchronization for node claims.
//!
//! The controller in this crate is a pure translation/consistency layer: it
//! watches the authoritative resource store for node-claim changes and
//! applies idempotent upsert/delete operations to the cluster-state cache.
//! It holds no durable state of its own; periodic resync bounds the
//! staleness window even when the store's notification channel drops or
//! reorders events.

pub mod cluster;
pub mod config;
pub mod controller;
pub mod pool;
pub mod resource_store;

pub use cluster::InMemoryClusterState;
pub use config::{ConfigError, SyncConfig};
pub use controller::{NodeClaimSyncController, ReconcileOutcome};
pub use pool::SyncWorkerPool;
pub use resource_store::InMemoryResourceStore;
