//! Shared helpers for the synchronization integration tests.
#![allow(dead_code)]

use claimstate_domain::{
    NodeClaim, NodeClaimSpec, NodeClassReference, Requirement, RequirementOperator,
    ResourceRequirements,
};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Installs a fmt subscriber once so failing runs have controller logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A minimal valid claim constrained to the given zones.
pub fn zone_claim(name: &str, zones: &[&str]) -> NodeClaim {
    NodeClaim::new(name, zone_spec(zones)).expect("valid test spec")
}

pub fn zone_spec(zones: &[&str]) -> NodeClaimSpec {
    NodeClaimSpec {
        taints: vec![],
        startup_taints: vec![],
        requirements: vec![Requirement::new(
            "topology.kubernetes.io/zone",
            RequirementOperator::In,
            zones.iter().map(|z| z.to_string()).collect(),
        )],
        resources: ResourceRequirements::default(),
        node_class_ref: NodeClassReference {
            group: "provider.sh".to_string(),
            kind: "NodeClass".to_string(),
            name: "default".to_string(),
        },
    }
}

/// Polls `check` every few milliseconds until it holds or the deadline
/// elapses, panicking with `what` on timeout.
pub async fn wait_for<F, Fut>(what: &str, deadline: Duration, mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let started = tokio::time::Instant::now();
    loop {
        if check().await {
            return;
        }
        if started.elapsed() > deadline {
            panic!("timed out waiting for {what}");
        }
        sleep(Duration::from_millis(10)).await;
    }
}
