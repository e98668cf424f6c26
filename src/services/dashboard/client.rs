//! HTTP client for the wallet history API.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::{
	models::{NetworkConfig, Transaction},
	services::{
		api::{HealthResponse, NetworksResponse, TransactionResponse, TransactionsResponse},
		dashboard::{
			error::INVALID_URL_CODE, retry_with_backoff, ApiError, FetchError, RetryPolicy,
		},
	},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const HISTORY_ATTEMPTS: usize = 3;
const LOOKUP_ATTEMPTS: usize = 2;

/// Source of wallet transactions for a [`FetchCoordinator`](super::FetchCoordinator)
#[async_trait]
pub trait TransactionFetcher: Send + Sync {
	async fn fetch_transactions(
		&self,
		wallet: &str,
		network: &str,
		token: &CancellationToken,
	) -> Result<Vec<Transaction>, FetchError>;
}

/// Client for the endpoints served by [`create_api_server`](crate::services::api::create_api_server)
#[derive(Clone, Debug)]
pub struct DashboardApiClient {
	client: reqwest::Client,
	base_url: Url,
}

impl DashboardApiClient {
	/// Creates a client for `base_url` with a 30 second request timeout
	pub fn new(base_url: &str) -> Result<Self, anyhow::Error> {
		Self::with_timeout(base_url, DEFAULT_TIMEOUT)
	}

	pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
		let mut base_url = Url::parse(base_url)
			.map_err(|e| anyhow::anyhow!("Invalid API base URL '{}': {}", base_url, e))?;
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());
			base_url.set_path(&path);
		}
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

		Ok(Self { client, base_url })
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
		self.base_url.join(path).map_err(|e| ApiError {
			message: format!("Invalid request path '{}': {}", path, e),
			code: Some(INVALID_URL_CODE.to_string()),
			status: None,
		})
	}

	async fn get_json<T: DeserializeOwned>(
		&self,
		path: &str,
		query: &[(&str, &str)],
	) -> Result<T, ApiError> {
		let url = self.endpoint(path)?;
		let response = self
			.client
			.get(url)
			.query(query)
			.send()
			.await
			.map_err(|e| ApiError::from_transport(&e))?;

		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| ApiError::from_transport(&e))?;

		if !status.is_success() {
			return Err(ApiError::from_response(status.as_u16(), &body));
		}

		serde_json::from_str(&body).map_err(|e| ApiError {
			message: format!("Failed to decode response: {}", e),
			code: Some("ERR_BAD_RESPONSE".to_string()),
			status: None,
		})
	}

	/// Fetches the history of `wallet`, retrying transient failures up to three
	/// attempts in total
	pub async fn get_transactions(
		&self,
		wallet: &str,
		network: &str,
		token: &CancellationToken,
	) -> Result<TransactionsResponse, FetchError> {
		let query = [("wallet", wallet), ("network", network)];
		retry_with_backoff(&RetryPolicy::new(HISTORY_ATTEMPTS), token, || {
			self.get_json("api/transactions", &query)
		})
		.await
	}

	/// Looks up one transaction by hash, with up to two attempts
	pub async fn get_transaction_by_hash(
		&self,
		hash: &str,
		network: &str,
		token: &CancellationToken,
	) -> Result<Transaction, FetchError> {
		let path = format!("api/transactions/{}", hash);
		let query = [("network", network)];
		let response: TransactionResponse =
			retry_with_backoff(&RetryPolicy::new(LOOKUP_ATTEMPTS), token, || {
				self.get_json(&path, &query)
			})
			.await?;

		Ok(response.transaction)
	}

	pub async fn get_networks(&self) -> Result<Vec<NetworkConfig>, ApiError> {
		let response: NetworksResponse = self.get_json("api/networks", &[]).await?;
		Ok(response.networks)
	}

	pub async fn health(&self) -> Result<HealthResponse, ApiError> {
		self.get_json("", &[]).await
	}
}

#[async_trait]
impl TransactionFetcher for DashboardApiClient {
	async fn fetch_transactions(
		&self,
		wallet: &str,
		network: &str,
		token: &CancellationToken,
	) -> Result<Vec<Transaction>, FetchError> {
		self.get_transactions(wallet, network, token)
			.await
			.map(|response| response.page.transactions)
	}
}
