//! HyperSync client.
//!
//! Queries are posted to `{url}/query` and the chain height is read from
//! `{url}/height`. Responses are decoded into [`QueryResponse`].

use async_trait::async_trait;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

use crate::{
	models::{NetworkConfig, Query, QueryResponse},
	services::blockchain::{
		client::{IndexerClient, StreamConfig, TransactionStream},
		clients::HyperSyncStream,
		transports::{HttpTransportClient, IndexerTransport, TransportError},
		BlockChainError,
	},
	utils::{http::RetryConfig, metrics::UPSTREAM_BATCHES},
};

/// Client for one HyperSync endpoint
pub struct HyperSyncClient<T: IndexerTransport> {
	transport: Arc<T>,
	network: NetworkConfig,
}

impl<T: IndexerTransport> Clone for HyperSyncClient<T> {
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			network: self.network.clone(),
		}
	}
}

impl HyperSyncClient<HttpTransportClient> {
	/// Creates a client over HTTP for `network`
	pub fn new(
		network: &NetworkConfig,
		retry_config: &RetryConfig,
		bearer_token: Option<String>,
	) -> Result<Self, BlockChainError> {
		let transport = HttpTransportClient::new(network, retry_config, bearer_token).map_err(|e| {
			BlockChainError::connection_error(
				format!("Failed to create transport for network {}", network.slug),
				Some(e.into()),
				None,
			)
		})?;
		Ok(Self::new_with_transport(network, transport))
	}
}

impl<T: IndexerTransport> HyperSyncClient<T> {
	/// Creates a client over an existing transport
	pub fn new_with_transport(network: &NetworkConfig, transport: T) -> Self {
		Self {
			transport: Arc::new(transport),
			network: network.clone(),
		}
	}

	pub fn network(&self) -> &NetworkConfig {
		&self.network
	}

	fn metadata(&self) -> Option<HashMap<String, String>> {
		Some(HashMap::from([
			("network".to_string(), self.network.slug.clone()),
			("url".to_string(), self.transport.base_url().to_string()),
		]))
	}

	/// Connection failures become [`BlockChainError::ConnectionError`], everything
	/// else the indexer answered becomes [`BlockChainError::RequestError`].
	fn transport_failure(&self, msg: &str, error: TransportError) -> BlockChainError {
		if error.is_transient() {
			BlockChainError::connection_error(msg, Some(Box::new(error)), self.metadata())
		} else {
			BlockChainError::request_error(msg, Some(Box::new(error)), self.metadata())
		}
	}
}

#[async_trait]
impl<T: IndexerTransport + 'static> IndexerClient for HyperSyncClient<T> {
	async fn get_height(&self) -> Result<u64, BlockChainError> {
		let body = self
			.transport
			.get_json("height")
			.await
			.map_err(|e| self.transport_failure("Failed to get chain height", e))?;

		body.get("height").and_then(Value::as_u64).ok_or_else(|| {
			BlockChainError::request_error(
				"Indexer height response has no height",
				None,
				self.metadata(),
			)
		})
	}

	async fn query(&self, query: &Query) -> Result<QueryResponse, BlockChainError> {
		tracing::debug!(
			network = %self.network.slug,
			from_block = query.from_block,
			to_block = ?query.to_block,
			"querying indexer"
		);

		let body = self
			.transport
			.post_json("query", query)
			.await
			.map_err(|e| self.transport_failure("Indexer query failed", e))?;

		let response: QueryResponse = serde_json::from_value(body).map_err(|e| {
			BlockChainError::request_error(
				"Failed to decode indexer response",
				Some(Box::new(e)),
				self.metadata(),
			)
		})?;

		UPSTREAM_BATCHES
			.with_label_values(&[self.network.slug.as_str()])
			.inc();

		Ok(response)
	}

	async fn stream(
		&self,
		query: Query,
		config: StreamConfig,
	) -> Result<Box<dyn TransactionStream>, BlockChainError> {
		if config.reverse && config.reverse_window == 0 {
			return Err(BlockChainError::internal_error(
				"Reverse window must be greater than zero",
				None,
				self.metadata(),
			));
		}

		Ok(Box::new(HyperSyncStream::new(self.clone(), query, config)))
	}
}
