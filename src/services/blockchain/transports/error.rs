//! Failures of a single indexer HTTP exchange.
//!
//! Only [`TransportError::Unreachable`] means no response was received; the
//! other variants mean the indexer answered with something unusable.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use reqwest::StatusCode;
use std::collections::HashMap;
use thiserror::Error;

/// Longest part of an error body kept on a [`TransportError::Status`]
const MAX_BODY_EXCERPT: usize = 512;

#[derive(Debug, Error)]
pub enum TransportError {
	/// The indexer answered with a non-success status
	#[error("Indexer returned {status} for {endpoint}")]
	Status {
		status: StatusCode,
		endpoint: String,
		/// Start of the response body
		body: String,
		context: ErrorContext,
	},

	/// No response: refused connection, DNS failure or timeout
	#[error("Indexer unreachable: {0}")]
	Unreachable(ErrorContext),

	/// A success response whose body is not the expected JSON
	#[error("Malformed indexer response: {0}")]
	Decode(ErrorContext),

	/// The query could not be encoded as JSON
	#[error("Query could not be encoded: {0}")]
	Encode(ErrorContext),
}

fn excerpt(body: &str) -> String {
	match body.char_indices().nth(MAX_BODY_EXCERPT) {
		Some((cut, _)) => format!("{}...", &body[..cut]),
		None => body.to_string(),
	}
}

impl TransportError {
	pub fn status(
		status: StatusCode,
		endpoint: impl Into<String>,
		body: &str,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let endpoint = endpoint.into();
		let context = ErrorContext::new_with_log(
			format!("Indexer returned {} for {}", status, endpoint),
			None,
			metadata,
		);

		Self::Status {
			status,
			endpoint,
			body: excerpt(body),
			context,
		}
	}

	pub fn unreachable(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Unreachable(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn decode(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Decode(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn encode(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Encode(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Whether the failure happened before any HTTP response was received
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::Unreachable(_))
	}

	/// Status code of the indexer's answer, if there was one
	pub fn status_code(&self) -> Option<StatusCode> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}

	fn context(&self) -> &ErrorContext {
		match self {
			Self::Status { context, .. } => context,
			Self::Unreachable(ctx) | Self::Decode(ctx) | Self::Encode(ctx) => ctx,
		}
	}
}

impl TraceableError for TransportError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
