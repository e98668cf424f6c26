//! Retry with exponential backoff and cancellation.
//!
//! Only failures without an HTTP response are retried. Cancellation is checked
//! before every attempt and raced against both the request and the backoff
//! sleep, so a cancelled call returns [`FetchError::Cancelled`] right away.

use backon::{ExponentialBuilder, Retryable};
use std::{future::Future, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::services::dashboard::{ApiError, FetchError};

/// Attempt ceiling and delay bounds for one kind of request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
	/// Total attempts, the first one included
	pub max_attempts: usize,
	pub min_delay: Duration,
	pub max_delay: Duration,
	pub factor: f32,
}

impl RetryPolicy {
	/// Delays start at 1s and double up to 10s.
	pub fn new(max_attempts: usize) -> Self {
		Self {
			max_attempts: max_attempts.max(1),
			min_delay: Duration::from_secs(1),
			max_delay: Duration::from_secs(10),
			factor: 2.0,
		}
	}

	fn backoff(&self) -> ExponentialBuilder {
		ExponentialBuilder::default()
			.with_min_delay(self.min_delay)
			.with_max_delay(self.max_delay)
			.with_factor(self.factor)
			.with_max_times(self.max_attempts.saturating_sub(1))
	}
}

/// Runs `operation` under `policy` until it succeeds, fails terminally, runs
/// out of attempts or `token` is cancelled.
pub async fn retry_with_backoff<T, F, Fut>(
	policy: &RetryPolicy,
	token: &CancellationToken,
	operation: F,
) -> Result<T, FetchError>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, ApiError>>,
{
	let mut operation = operation;
	let attempt = || {
		let request = if token.is_cancelled() {
			None
		} else {
			Some(operation())
		};
		async move {
			match request {
				None => Err(FetchError::Cancelled),
				Some(request) => request.await.map_err(FetchError::Failed),
			}
		}
	};

	let should_retry = |e: &FetchError| matches!(e, FetchError::Failed(api) if api.is_retryable());

	let retries = attempt
		.retry(policy.backoff())
		.when(should_retry)
		.notify(|e: &FetchError, delay: Duration| {
			warn!("Request failed, retrying in {:?}: {}", delay, e);
		});

	tokio::select! {
		biased;
		_ = token.cancelled() => Err(FetchError::Cancelled),
		result = retries => result,
	}
}
