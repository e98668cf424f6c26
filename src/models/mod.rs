//! Domain models and data structures.
//!
//! - `blockchain`: wire types of the HyperSync indexer API
//! - `config`: configuration loading and validation
//! - `core`: networks, transactions, queries and wallet chains

mod blockchain;
mod config;
mod core;

pub use blockchain::hypersync::{
	BlockField, FieldSelection, HyperSyncBlock, HyperSyncTransaction, JoinMode, Query,
	QueryResponse, ResponseData, TransactionField, TransactionSelection,
};

pub use core::{
	default_chains, find_chain, is_transaction_hash, is_wallet_address, ChainInfo,
	NativeCurrency, NetworkConfig, NetworkTier, RawTransactionParams, Transaction,
	TransactionPage, TransactionQuery, TransactionStatus, ValidationErrors,
};

pub use config::{ConfigError, ConfigLoader};
