//! Snapshot flow: snapshot a running instance's boot disk

use crate::error::Result;
use vmforge_compute::{ComputeApi, PollConfig, wait_for_operation};
use vmforge_core::{Operation, SnapshotSpec};

#[derive(Debug)]
pub struct SnapshotOutcome {
    pub snapshot_name: String,
    pub operation: Operation,
}

/// Snapshot `instance_name`'s boot disk and wait for the operation.
///
/// The boot disk shares the instance's name (the default when the disk is
/// created with the instance). When `snapshot_name` is `None` the
/// conventional `base-snapshot-<instance>` name is used.
pub async fn snapshot_boot_disk(
    api: &dyn ComputeApi,
    instance_name: &str,
    snapshot_name: Option<String>,
    poll: &PollConfig,
) -> Result<SnapshotOutcome> {
    let name = snapshot_name.unwrap_or_else(|| SnapshotSpec::base_name_for(instance_name));
    let spec = SnapshotSpec::new(&name)
        .with_description(format!("Boot-disk snapshot of {}", instance_name));

    tracing::info!(instance = %instance_name, snapshot = %name, "Creating snapshot");

    let operation = api.create_snapshot(instance_name, &spec).await?;
    let operation = wait_for_operation(api, &operation, poll).await?;

    tracing::info!(snapshot = %name, "Snapshot created");

    Ok(SnapshotOutcome {
        snapshot_name: name,
        operation,
    })
}
