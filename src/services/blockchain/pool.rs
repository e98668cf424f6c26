//! Client pool for indexer clients.
//!
//! Clients are created lazily on first use and cached by network slug, so every
//! request for the same network shares one HTTP connection pool.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
	models::NetworkConfig,
	services::blockchain::{BlockChainError, HyperSyncClient, IndexerClient},
	utils::{client_storage::ClientStorage, http::RetryConfig},
};

/// Trait for the client pool.
#[async_trait]
pub trait ClientPoolTrait: Send + Sync {
	/// Returns the cached client for `network`, creating it on first use
	async fn get_client(
		&self,
		network: &NetworkConfig,
	) -> Result<Arc<dyn IndexerClient>, BlockChainError>;
}

/// Pool of HyperSync clients keyed by network slug
pub struct ClientPool {
	storage: ClientStorage<dyn IndexerClient>,
	retry_config: RetryConfig,
	bearer_token: Option<String>,
}

impl ClientPool {
	/// Creates an empty pool; `bearer_token` is sent with every indexer request.
	pub fn new(retry_config: RetryConfig, bearer_token: Option<String>) -> Self {
		Self {
			storage: ClientStorage::new(),
			retry_config,
			bearer_token,
		}
	}

	/// Number of clients created so far
	pub async fn get_client_count(&self) -> usize {
		self.storage.len().await
	}
}

impl Default for ClientPool {
	fn default() -> Self {
		Self::new(RetryConfig::default(), None)
	}
}

#[async_trait]
impl ClientPoolTrait for ClientPool {
	async fn get_client(
		&self,
		network: &NetworkConfig,
	) -> Result<Arc<dyn IndexerClient>, BlockChainError> {
		self.storage
			.get_or_try_insert(&network.slug, || async {
				tracing::debug!(network = %network.slug, url = %network.url, "creating indexer client");
				let client =
					HyperSyncClient::new(network, &self.retry_config, self.bearer_token.clone())
						.map_err(|e| {
							BlockChainError::client_pool_error(
								format!("Failed to create client for network {}", network.slug),
								Some(Box::new(e)),
								None,
							)
						})?;
				Ok::<_, BlockChainError>(Arc::new(client) as Arc<dyn IndexerClient>)
			})
			.await
	}
}
