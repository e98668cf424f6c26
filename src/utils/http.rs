//! HTTP client construction shared by the indexer transport.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
	policies::ExponentialBackoff, Jitter, RetryTransientMiddleware, RetryableStrategy,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_max_retries() -> u32 {
	3
}

fn default_initial_backoff() -> Duration {
	Duration::from_millis(250)
}

fn default_max_backoff() -> Duration {
	Duration::from_secs(10)
}

fn default_base_for_backoff() -> u32 {
	2
}

fn default_request_timeout() -> Duration {
	Duration::from_secs(60)
}

/// Jitter applied to retry delays
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JitterSetting {
	None,
	#[default]
	Full,
}

/// Retry and timeout settings for calls to the indexing service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RetryConfig {
	/// Maximum number of retries for transient errors
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
	/// Base of the exponential backoff
	#[serde(default = "default_base_for_backoff")]
	pub base_for_backoff: u32,
	/// Delay before the first retry
	#[serde(default = "default_initial_backoff")]
	pub initial_backoff: Duration,
	/// Upper bound for a single delay
	#[serde(default = "default_max_backoff")]
	pub max_backoff: Duration,
	#[serde(default)]
	pub jitter: JitterSetting,
	/// Per-request timeout; large block ranges can take tens of seconds upstream
	#[serde(default = "default_request_timeout")]
	pub request_timeout: Duration,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_retries: default_max_retries(),
			base_for_backoff: default_base_for_backoff(),
			initial_backoff: default_initial_backoff(),
			max_backoff: default_max_backoff(),
			jitter: JitterSetting::default(),
			request_timeout: default_request_timeout(),
		}
	}
}

/// Wraps `base_client` with a transient-error retry middleware built from `config`.
///
/// `custom_strategy` replaces the default classification of retryable responses.
pub fn create_retryable_http_client<S>(
	config: &RetryConfig,
	base_client: reqwest::Client,
	custom_strategy: Option<S>,
) -> ClientWithMiddleware
where
	S: RetryableStrategy + Send + Sync + 'static,
{
	let policy_builder = match config.jitter {
		JitterSetting::None => ExponentialBackoff::builder().jitter(Jitter::None),
		JitterSetting::Full => ExponentialBackoff::builder().jitter(Jitter::Full),
	};

	let retry_policy = policy_builder
		.base(config.base_for_backoff)
		.retry_bounds(config.initial_backoff, config.max_backoff)
		.build_with_max_retries(config.max_retries);

	match custom_strategy {
		Some(strategy) => ClientBuilder::new(base_client).with(
			RetryTransientMiddleware::new_with_policy_and_strategy(retry_policy, strategy),
		),
		None => ClientBuilder::new(base_client)
			.with(RetryTransientMiddleware::new_with_policy(retry_policy)),
	}
	.build()
}
