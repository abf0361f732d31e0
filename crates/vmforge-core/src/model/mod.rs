//! Wire model
//!
//! Serde types for the compute control plane's REST surface. Field names
//! follow the camelCase wire format; the structs stay close to the JSON
//! the API actually accepts and returns.

mod firewall;
mod instance;
mod operation;
mod snapshot;

// Re-exports
pub use firewall::*;
pub use instance::*;
pub use operation::*;
pub use snapshot::*;
