//! Core domain models.
//!
//! - Networks: indexer endpoints and their metadata
//! - Transactions: records returned to callers
//! - Queries: validated transaction history requests
//! - Chains: wallet-side chain descriptions

mod chain;
mod network;
mod query;
mod transaction;

pub use chain::{default_chains, find_chain, ChainInfo, NativeCurrency};
pub use network::{NetworkConfig, NetworkTier};
pub use query::{
	is_transaction_hash, is_wallet_address, RawTransactionParams, TransactionQuery,
	ValidationErrors,
};
pub use transaction::{Transaction, TransactionPage, TransactionStatus};
