//! Control-plane trait definition

use crate::error::Result;
use async_trait::async_trait;
use vmforge_core::{FirewallRule, Instance, InstanceSpec, Operation, SnapshotSpec};

/// Compute control-plane abstraction.
///
/// Orchestration code depends on this trait rather than on
/// [`crate::ComputeClient`] directly, which keeps the create/wait/report
/// flows testable without a network.
///
/// Mutating calls are fire-and-forget from the caller's perspective: the
/// control plane accepts the body and returns an [`Operation`] handle
/// immediately; the resource becomes usable only once that operation
/// reaches DONE (see [`crate::wait_for_operation`]).
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// The zone this client is scoped to (e.g. `us-west1-b`).
    fn zone(&self) -> &str;

    /// Submit an instance for creation in the configured zone.
    async fn insert_instance(&self, spec: &InstanceSpec) -> Result<Operation>;

    /// Read a single instance by name.
    async fn get_instance(&self, name: &str) -> Result<Instance>;

    /// List the zone's instances. An empty zone yields an empty vec, not
    /// an error.
    async fn list_instances(&self) -> Result<Vec<Instance>>;

    /// Look up a firewall rule. The three outcomes are value-tagged:
    /// `Ok(Some(_))` found, `Ok(None)` not found, `Err(_)` anything else.
    async fn get_firewall(&self, name: &str) -> Result<Option<FirewallRule>>;

    /// Submit a firewall rule for creation (global operation handle).
    async fn insert_firewall(&self, rule: &FirewallRule) -> Result<Operation>;

    /// Snapshot a zonal disk.
    async fn create_snapshot(&self, disk: &str, spec: &SnapshotSpec) -> Result<Operation>;

    /// Poll a zonal operation by name.
    async fn get_zone_operation(&self, name: &str) -> Result<Operation>;
}
