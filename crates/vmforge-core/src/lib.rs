//! VMForge core data model
//!
//! Wire types for the compute control plane: instance specs, firewall
//! rules, snapshots, and long-running operations, plus the resource path
//! helpers that the REST surface expects (`zones/<zone>/machineTypes/...`,
//! `global/snapshots/...`).
//!
//! Everything here is plain data. Nothing talks to the network; the
//! `vmforge-compute` crate does that.

pub mod error;
pub mod model;
pub mod paths;

pub use error::{CoreError, Result};
pub use model::{
    AccessConfig, AttachedDisk, FirewallAllowed, FirewallRule, InitializeParams, Instance,
    InstanceSpec, Metadata, MetadataItem, NetworkInterface, Operation, OperationError,
    OperationErrorDetail, OperationStatus, SnapshotSpec, Tags,
};
