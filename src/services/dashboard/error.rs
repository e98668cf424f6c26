//! Error shapes seen by dashboard callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

use crate::services::api::ApiErrorBody;

/// Code for a request URL that could not be built
pub const INVALID_URL_CODE: &str = "ERR_INVALID_URL";

/// Normalized failure of an API call.
///
/// `status` is only set when the server answered; a missing status means the
/// request never got a response (timeout, refused connection, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<u16>,
}

impl ApiError {
	/// Builds the error for a non-success HTTP response.
	///
	/// The server's `{error, message}` body is used when it can be decoded.
	pub fn from_response(status: u16, body: &str) -> Self {
		match serde_json::from_str::<ApiErrorBody>(body) {
			Ok(body) => Self {
				message: body.message,
				code: Some(body.error),
				status: Some(status),
			},
			Err(_) => Self {
				message: format!("Request failed with status code {}", status),
				code: None,
				status: Some(status),
			},
		}
	}

	/// Builds the error for a request that failed without a usable response
	pub fn from_transport(error: &reqwest::Error) -> Self {
		let code = if error.is_timeout() {
			"ETIMEDOUT"
		} else if error.is_connect() {
			"ECONNREFUSED"
		} else if error.is_decode() {
			"ERR_BAD_RESPONSE"
		} else {
			"ERR_NETWORK"
		};

		Self {
			message: error.to_string(),
			code: Some(code.to_string()),
			status: error.status().map(|status| status.as_u16()),
		}
	}

	/// Retried only when no HTTP response was received
	pub fn is_retryable(&self) -> bool {
		self.status.is_none()
			&& !matches!(
				self.code.as_deref(),
				Some("ERR_BAD_RESPONSE") | Some(INVALID_URL_CODE)
			)
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (&self.code, self.status) {
			(Some(code), Some(status)) => write!(f, "{} ({}, {})", self.message, code, status),
			(Some(code), None) => write!(f, "{} ({})", self.message, code),
			(None, Some(status)) => write!(f, "{} ({})", self.message, status),
			(None, None) => write!(f, "{}", self.message),
		}
	}
}

impl std::error::Error for ApiError {}

/// Outcome of a failed fetch
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
	/// The caller cancelled the request; not a failure
	#[error("Request cancelled")]
	Cancelled,

	/// The request failed after the allowed attempts
	#[error("{0}")]
	Failed(ApiError),
}

impl FetchError {
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}

impl From<ApiError> for FetchError {
	fn from(error: ApiError) -> Self {
		Self::Failed(error)
	}
}
