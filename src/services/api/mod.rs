//! HTTP API.
//!
//! - `GET /`: liveness
//! - `GET /api/transactions`: wallet history (query string parameters)
//! - `GET /api/transactions/{wallet_or_hash}`: wallet history or a single transaction
//! - `GET /api/networks`: network catalog, optionally filtered by tier
//! - `GET /metrics`: Prometheus metrics

mod error;
mod handlers;
mod server;

pub use error::ApiErrorBody;
pub use handlers::{HealthResponse, NetworksResponse, TransactionResponse, TransactionsResponse};
pub use server::{configure_routes, create_api_server};
