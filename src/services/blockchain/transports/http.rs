//! HTTP transport for the HyperSync JSON API.
//!
//! Wraps a retryable `reqwest` client. Transient failures (connection errors,
//! timeouts, 5xx, 429) are retried by the middleware with exponential backoff;
//! anything left over is reported as a [`TransportError`]. An optional bearer
//! token is attached to every request.

use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::{collections::HashMap, time::Duration};
use url::Url;

use crate::{
	models::NetworkConfig,
	services::blockchain::transports::{
		IndexerTransport, TransientErrorRetryStrategy, TransportError,
	},
	utils::http::{create_retryable_http_client, RetryConfig},
};

/// HTTP transport bound to one indexer endpoint
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Retryable HTTP client for making requests
	pub client: ClientWithMiddleware,
	base_url: String,
	bearer_token: Option<String>,
}

impl HttpTransportClient {
	/// Creates a transport for `network.url`.
	///
	/// No request is made here; an unreachable endpoint surfaces on first use.
	pub fn new(
		network: &NetworkConfig,
		retry_config: &RetryConfig,
		bearer_token: Option<String>,
	) -> Result<Self, anyhow::Error> {
		let url = Url::parse(&network.url)
			.with_context(|| format!("Invalid indexer URL: {}", network.url))?;

		let base_http_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(retry_config.request_timeout)
			.connect_timeout(Duration::from_secs(20))
			.build()
			.context("Failed to create base HTTP client")?;

		let client = create_retryable_http_client(
			retry_config,
			base_http_client,
			Some(TransientErrorRetryStrategy),
		);

		Ok(Self {
			client,
			base_url: url.as_str().trim_end_matches('/').to_string(),
			bearer_token: bearer_token.filter(|token| !token.trim().is_empty()),
		})
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}

	fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
		match &self.bearer_token {
			Some(token) => request.bearer_auth(token),
			None => request,
		}
	}

	async fn send(&self, url: String, request: RequestBuilder) -> Result<Value, TransportError> {
		let response = self.authorize(request).send().await.map_err(|e| {
			tracing::warn!("Network error while sending request to {}: {}", url, e);
			TransportError::unreachable(
				"Failed to reach indexer",
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), url.clone())])),
			)
		})?;

		let status = response.status();
		if !status.is_success() {
			let error_body = response.text().await.unwrap_or_default();
			tracing::warn!(
				"Request to {} failed with status {}: {}",
				url,
				status,
				error_body
			);
			return Err(TransportError::status(status, url, &error_body, None));
		}

		response.json().await.map_err(|e| {
			TransportError::decode(
				"Failed to parse JSON response",
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), url)])),
			)
		})
	}
}

#[async_trait]
impl IndexerTransport for HttpTransportClient {
	fn base_url(&self) -> &str {
		&self.base_url
	}

	async fn get_json(&self, path: &str) -> Result<Value, TransportError> {
		let url = self.endpoint(path);
		let request = self.client.get(&url);
		self.send(url, request).await
	}

	async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value, TransportError>
	where
		B: Serialize + Send + Sync,
	{
		let url = self.endpoint(path);
		let request_body = serde_json::to_string(body).map_err(|e| {
			TransportError::encode(
				"Failed to serialize request JSON",
				Some(Box::new(e)),
				None,
			)
		})?;

		let request = self
			.client
			.post(&url)
			.header("Content-Type", "application/json")
			.body(request_body);
		self.send(url, request).await
	}
}
