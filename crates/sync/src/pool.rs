//! Bounded worker pool driving reconciliation cycles.
//!
//! Notifications are consumed from a name stream and dispatched to spawned
//! cycles, with two guarantees:
//!
//! - at most `max_concurrent_reconciles` cycles in flight across distinct
//!   keys (semaphore),
//! - at most one in-flight reconciliation per key; a notification for a key
//!   that is already queued or running is skipped. The skipped update is
//!   picked up by that cycle itself (it re-reads the store) or by the
//!   periodic resync.
//!
//! A successful upsert schedules a resync of the same key after
//! `resync_period`; a transient failure or a cycle deadline re-enqueues the
//! key after `retry_delay`. A deletion schedules nothing, a future create
//! publishes a fresh notification.

use crate::config::SyncConfig;
use crate::controller::{NodeClaimSyncController, ReconcileOutcome};
use claimstate_domain::NodeClaimName;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch, Semaphore};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "claimstate::sync";

pub struct SyncWorkerPool {
    controller: Arc<NodeClaimSyncController>,
    config: SyncConfig,
    semaphore: Arc<Semaphore>,
    in_flight: Arc<Mutex<HashSet<NodeClaimName>>>,
}

impl SyncWorkerPool {
    pub fn new(controller: Arc<NodeClaimSyncController>, config: SyncConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_reconciles));
        Self {
            controller,
            config,
            semaphore,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Consumes notifications until the stream ends or `shutdown` flips to
    /// true. Cycles already in flight run to completion; resyncs scheduled
    /// after shutdown are dropped.
    pub async fn run(
        &self,
        mut events: BoxStream<'static, NodeClaimName>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(
            target: LOG_TARGET,
            max_concurrent = self.config.max_concurrent_reconciles,
            resync_period = ?self.config.resync_period,
            "sync worker pool started"
        );

        let (requeue_tx, mut requeue_rx) = mpsc::unbounded_channel();
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        info!(target: LOG_TARGET, "sync worker pool shutting down");
                        break;
                    }
                }
                maybe_name = events.next() => match maybe_name {
                    Some(name) => self.dispatch(name, &requeue_tx),
                    None => {
                        info!(target: LOG_TARGET, "notification stream closed, stopping pool");
                        break;
                    }
                },
                Some(name) = requeue_rx.recv() => self.dispatch(name, &requeue_tx),
            }
        }
    }

    fn dispatch(&self, name: NodeClaimName, requeue_tx: &mpsc::UnboundedSender<NodeClaimName>) {
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            if !in_flight.insert(name.clone()) {
                debug!(target: LOG_TARGET, nodeclaim = %name, "cycle already in flight, coalescing");
                return;
            }
        }

        let controller = self.controller.clone();
        let semaphore = self.semaphore.clone();
        let in_flight = self.in_flight.clone();
        let requeue_tx = requeue_tx.clone();
        let config = self.config.clone();

        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            let result = timeout(config.cycle_timeout, controller.reconcile(&name)).await;
            in_flight.lock().unwrap().remove(&name);

            match result {
                Ok(Ok(ReconcileOutcome::Upserted)) => {
                    schedule(requeue_tx, name, config.resync_period);
                }
                Ok(Ok(ReconcileOutcome::Deleted)) => {}
                Ok(Err(err)) => {
                    warn!(target: LOG_TARGET, nodeclaim = %name, error = %err, "reconcile failed, will retry");
                    schedule(requeue_tx, name, config.retry_delay);
                }
                Err(_) => {
                    warn!(target: LOG_TARGET, nodeclaim = %name, "reconcile cycle hit its deadline, will retry");
                    schedule(requeue_tx, name, config.retry_delay);
                }
            }
        });
    }
}

/// Re-enqueues `name` after `delay`. The send fails silently once the pool
/// has shut down.
fn schedule(requeue_tx: mpsc::UnboundedSender<NodeClaimName>, name: NodeClaimName, delay: Duration) {
    tokio::spawn(async move {
        sleep(delay).await;
        let _ = requeue_tx.send(name);
    });
}
