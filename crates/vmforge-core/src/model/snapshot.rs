//! Snapshot types

use serde::{Deserialize, Serialize};

/// Request body for snapshotting a disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SnapshotSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Conventional snapshot name for an instance's boot disk.
    pub fn base_name_for(instance_name: &str) -> String {
        format!("base-snapshot-{}", instance_name)
    }
}
