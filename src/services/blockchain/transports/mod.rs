//! Network transport for the indexing service.
//!
//! The indexer speaks plain JSON over HTTP: queries are posted and the chain
//! height is read with a GET. Retries of transient failures happen inside the
//! transport so callers only see terminal errors.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransportClient;

use reqwest_retry::{
	default_on_request_failure, default_on_request_success, Retryable, RetryableStrategy,
};
use serde::Serialize;
use serde_json::Value;

/// Base trait for indexer transports
#[async_trait::async_trait]
pub trait IndexerTransport: Send + Sync {
	/// Base URL of the indexer, without trailing slash
	fn base_url(&self) -> &str;

	/// Sends a GET to `{base_url}/{path}` and returns the decoded body
	async fn get_json(&self, path: &str) -> Result<Value, TransportError>;

	/// Posts `body` to `{base_url}/{path}` and returns the decoded body
	async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value, TransportError>
	where
		B: Serialize + Send + Sync;
}

/// Retries connection failures, timeouts, 5xx and 429 responses
pub struct TransientErrorRetryStrategy;
impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(success) => default_on_request_success(success),
			Err(error) => default_on_request_failure(error),
		}
	}
}
