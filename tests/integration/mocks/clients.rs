use async_trait::async_trait;
use mockall::mock;
use std::sync::Arc;

use wallet_history::{
	models::{NetworkConfig, Query, QueryResponse},
	services::blockchain::{
		BlockChainError, ClientPoolTrait, IndexerClient, StreamConfig, TransactionStream,
	},
};

// Mock implementation of an indexer client.
// Used for testing the transaction service without an indexer.
mock! {
	pub IndexerClient {}

	#[async_trait]
	impl IndexerClient for IndexerClient {
		async fn get_height(&self) -> Result<u64, BlockChainError>;
		async fn query(&self, query: &Query) -> Result<QueryResponse, BlockChainError>;
		async fn stream(
			&self,
			query: Query,
			config: StreamConfig,
		) -> Result<Box<dyn TransactionStream>, BlockChainError>;
	}
}

// Mock implementation of a batch stream.
mock! {
	pub TransactionStream {}

	#[async_trait]
	impl TransactionStream for TransactionStream {
		async fn recv(&mut self) -> Result<Option<QueryResponse>, BlockChainError>;
		async fn close(&mut self) -> Result<(), BlockChainError>;
	}
}

// Mock implementation of the client pool.
mock! {
	pub ClientPool {}

	#[async_trait]
	impl ClientPoolTrait for ClientPool {
		async fn get_client(
			&self,
			network: &NetworkConfig,
		) -> Result<Arc<dyn IndexerClient>, BlockChainError>;
	}
}

/// Stream mock that yields `batches` in order, then `None`, and expects to be
/// closed exactly once
pub fn stream_of(batches: Vec<QueryResponse>) -> MockTransactionStream {
	let mut stream = MockTransactionStream::new();
	let mut batches = batches.into_iter();
	stream
		.expect_recv()
		.returning(move || Ok(batches.next()));
	stream.expect_close().times(1).returning(|| Ok(()));
	stream
}
