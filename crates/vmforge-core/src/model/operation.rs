//! Long-running operation types

use serde::{Deserialize, Serialize};

/// A control-plane operation handle.
///
/// Returned immediately by mutating calls; the resource it targets becomes
/// usable only once the operation reaches [`OperationStatus::Done`]. The
/// orchestrator only ever reads operations by polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,

    pub status: OperationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,

    /// Error block the control plane may embed in a DONE operation. DONE
    /// is treated as terminal either way; this is carried for callers
    /// that want to print it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }
}

/// The only states the control plane reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "DONE")]
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
