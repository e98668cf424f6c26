//! Indexer client interface.
//!
//! A client answers single queries and opens pull-based streams over a block
//! range. Streams hand out batches in order and must be closed by the consumer
//! once it stops pulling.

use async_trait::async_trait;

use crate::{
	models::{Query, QueryResponse},
	services::blockchain::BlockChainError,
	utils::constants::DEFAULT_REVERSE_WINDOW,
};

/// Direction and window size of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
	/// Deliver the newest blocks first
	pub reverse: bool,
	/// Number of blocks fetched per window in reverse mode
	pub reverse_window: u64,
}

impl Default for StreamConfig {
	fn default() -> Self {
		Self {
			reverse: false,
			reverse_window: DEFAULT_REVERSE_WINDOW,
		}
	}
}

impl StreamConfig {
	/// Newest-first stream with the default window
	pub fn reverse() -> Self {
		Self {
			reverse: true,
			..Default::default()
		}
	}
}

/// Ordered sequence of batches for one query.
///
/// `recv` yields `Ok(None)` once the range is exhausted or the stream was closed.
#[async_trait]
pub trait TransactionStream: Send {
	/// Pulls the next batch
	async fn recv(&mut self) -> Result<Option<QueryResponse>, BlockChainError>;

	/// Releases the stream; later `recv` calls yield `Ok(None)`
	async fn close(&mut self) -> Result<(), BlockChainError>;
}

/// Client for one indexer endpoint
#[async_trait]
pub trait IndexerClient: Send + Sync {
	/// Latest block number known to the indexer
	async fn get_height(&self) -> Result<u64, BlockChainError>;

	/// Runs a single query and returns the first page of results
	async fn query(&self, query: &Query) -> Result<QueryResponse, BlockChainError>;

	/// Opens a stream that pages through the whole range of `query`
	async fn stream(
		&self,
		query: Query,
		config: StreamConfig,
	) -> Result<Box<dyn TransactionStream>, BlockChainError>;
}
