//! Provisioning flows for VMForge
//!
//! Each flow composes the same three steps against the control plane:
//! request a resource, wait for its operation, inspect the result. All
//! flows are strictly sequential (no parallel submission, no overlapping
//! polls) and take the control plane as a [`vmforge_compute::ComputeApi`]
//! so they can run against mocks in tests.
//!
//! # Flows
//!
//! - [`ensure_firewall`]: check-then-create firewall idempotence
//! - [`deploy`]: firewall + instance from image + external IP
//! - [`snapshot_boot_disk`]: snapshot an instance's boot disk
//! - [`clone`]: K sequential clones from a snapshot, timed, with a report
//! - [`chain`]: chained provisioning via instance metadata payloads

pub mod chain;
pub mod clone;
pub mod deploy;
pub mod error;
pub mod firewall;
pub mod scripts;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use chain::{ChainPayloads, LaunchPlan, build_chained_spec};
pub use clone::{CloneBatchOptions, CloneTiming, clone_one, render_report, run_batch, write_report};
pub use deploy::{DeployOptions, Deployed, deploy};
pub use error::{ProvisionError, Result};
pub use firewall::{FirewallOutcome, ensure_firewall};
pub use snapshot::{SnapshotOutcome, snapshot_boot_disk};
