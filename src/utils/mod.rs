//! Utility modules shared across the crate.
//!
//! - client_storage: per-network client cache
//! - constants: process-wide defaults
//! - http: retryable HTTP client construction
//! - logging: tracing setup and error context
//! - metrics: Prometheus registry and counters
//! - parsing: size and quantity parsing
//! - tests: builders for test fixtures

pub mod client_storage;
pub mod constants;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod parsing;
pub mod tests;

pub use client_storage::ClientStorage;
pub use constants::*;
pub use http::*;
pub use parsing::*;
