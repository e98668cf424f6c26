//! Indexer client interfaces and implementations.
//!
//! - Client and stream traits
//! - HyperSync client over HTTP
//! - Transport with transient-error retries
//! - Client pool keyed by network

mod client;
mod clients;
mod error;
mod pool;
mod transports;

pub use client::{IndexerClient, StreamConfig, TransactionStream};
pub use clients::{HyperSyncClient, HyperSyncStream};
pub use error::BlockChainError;
pub use pool::{ClientPool, ClientPoolTrait};
pub use transports::{
	HttpTransportClient, IndexerTransport, TransientErrorRetryStrategy, TransportError,
};
