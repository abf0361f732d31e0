//! Operation poll loop
//!
//! The control plane's mutations are asynchronous: a create call returns
//! an operation handle, and the caller polls until DONE. The loop here is
//! a deliberate fixed-interval busy-wait via sleep; that matches the
//! control plane's contract, and the interval and the *absence* of a
//! deadline are explicit configuration, not hidden constants.

use crate::api::ComputeApi;
use crate::error::Result;
use std::time::Duration;
use tokio::time::sleep;
use vmforge_core::Operation;

/// Polling behavior for [`wait_for_operation`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed delay between polls.
    pub interval: Duration,

    /// When true, a failed poll iteration is logged and the loop
    /// continues (the agent-side mode); when false, the first poll error
    /// aborts the wait (the driver-side mode).
    pub tolerate_poll_errors: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            tolerate_poll_errors: false,
        }
    }
}

impl PollConfig {
    pub fn with_interval_secs(secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(secs),
            ..Self::default()
        }
    }

    pub fn tolerant(mut self) -> Self {
        self.tolerate_poll_errors = true;
        self
    }
}

/// Block the calling task until `operation` reaches DONE.
///
/// There is no timeout: polling continues indefinitely until the control
/// plane reports DONE or (in intolerant mode) a poll fails. A DONE result
/// is returned as-is; any error block the control plane embedded in it is
/// not inspected here. There is no cancellation path: once submitted, the
/// remote operation runs to completion regardless of this process.
pub async fn wait_for_operation(
    api: &dyn ComputeApi,
    operation: &Operation,
    config: &PollConfig,
) -> Result<Operation> {
    if operation.is_done() {
        return Ok(operation.clone());
    }

    tracing::info!(operation = %operation.name, "Waiting for operation to finish");

    loop {
        match api.get_zone_operation(&operation.name).await {
            Ok(current) if current.is_done() => {
                tracing::info!(operation = %current.name, "Operation finished");
                return Ok(current);
            }
            Ok(current) => {
                tracing::debug!(
                    operation = %current.name,
                    status = ?current.status,
                    "Operation still in progress"
                );
            }
            Err(e) if config.tolerate_poll_errors => {
                tracing::warn!(operation = %operation.name, error = %e, "Poll failed, retrying");
            }
            Err(e) => return Err(e),
        }

        sleep(config.interval).await;
    }
}
