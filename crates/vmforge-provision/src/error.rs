//! Provisioning flow error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Compute error: {0}")]
    Compute(#[from] vmforge_compute::ComputeError),

    #[error("Core error: {0}")]
    Core(#[from] vmforge_core::CoreError),

    #[error("Instance '{0}' has no external IP")]
    MissingExternalIp(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
