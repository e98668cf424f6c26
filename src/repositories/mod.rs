//! Repository implementations for configuration management.
//!
//! The network repository merges the compiled-in network catalog with optional
//! JSON overrides and serves lookups through [`NetworkService`].

mod error;
mod network;

pub use error::RepositoryError;
pub use network::{NetworkRepository, NetworkRepositoryTrait, NetworkService};
