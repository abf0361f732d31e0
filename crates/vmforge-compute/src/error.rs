//! Compute client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Control plane rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),

    #[error("Token signing failed: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),

    #[error("Metadata service error for key '{key}': {message}")]
    Metadata { key: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] vmforge_core::CoreError),
}

pub type Result<T> = std::result::Result<T, ComputeError>;
