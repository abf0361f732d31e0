//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(
        "Invalid resource name '{0}': must start with a lowercase letter, \
         contain only lowercase letters, digits and hyphens, not end with \
         a hyphen, and be at most 63 characters"
    )]
    InvalidName(String),

    #[error("Instance spec for '{0}' has no boot disk")]
    MissingBootDisk(String),

    #[error("Instance spec for '{0}' has both a source image and a source snapshot")]
    ConflictingBootSource(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
