//! Wallet transaction history.
//!
//! Resolves the requested network, streams the wallet's transactions from the
//! indexer newest first and cuts the requested page out of them.

mod error;
mod service;

pub use error::TransactionServiceError;
pub use service::{build_hash_query, build_wallet_query, TransactionService};
