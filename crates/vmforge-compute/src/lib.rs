//! Compute control-plane client for VMForge
//!
//! This crate owns everything that talks HTTP:
//!
//! - [`ComputeApi`]: the trait seam over the control plane, so
//!   orchestration code in `vmforge-provision` can run against mocks.
//! - [`ComputeClient`]: the real REST implementation.
//! - [`wait_for_operation`]: the fixed-interval operation poll loop.
//! - [`Authenticator`] / [`TokenSource`]: bearer-token acquisition.
//! - [`MetadataClient`]: the on-VM instance metadata service, used by
//!   `forge-agent` to pick up chained-launch payloads.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod metadata;
pub mod waiter;

pub use api::ComputeApi;
pub use auth::{Authenticator, ServiceAccountKey, TokenSource};
pub use client::{ComputeClient, ComputeConfig};
pub use error::{ComputeError, Result};
pub use metadata::MetadataClient;
pub use waiter::{PollConfig, wait_for_operation};
