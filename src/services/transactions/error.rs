//! Transaction service error types.
//!
//! Validation failures carry the structured [`ValidationErrors`] so the API can
//! hand them back to the caller. Indexer failures are wrapped unchanged.

use crate::{
	models::ValidationErrors,
	services::blockchain::BlockChainError,
	utils::logging::error::{ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Errors returned by the transaction service
#[derive(ThisError, Debug)]
pub enum TransactionServiceError {
	/// The request was rejected before reaching the indexer
	#[error("Validation error: {context}")]
	ValidationError {
		errors: ValidationErrors,
		context: ErrorContext,
	},

	/// The requested network is not configured
	#[error("Unknown network: {0}")]
	UnknownNetwork(ErrorContext),

	/// Nothing matched a lookup
	#[error("Not found: {0}")]
	NotFound(ErrorContext),

	/// The indexer failed; the error is passed through as received
	#[error(transparent)]
	Upstream(#[from] BlockChainError),

	/// Internal errors within the service
	#[error("Internal error: {0}")]
	InternalError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl TransactionServiceError {
	// Validation error; client mistakes are not logged as errors
	pub fn validation_error(
		errors: ValidationErrors,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = ErrorContext::new(errors.to_string(), None, metadata);
		Self::ValidationError { errors, context }
	}

	// Unknown network
	pub fn unknown_network(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UnknownNetwork(ErrorContext::new(msg, source, metadata))
	}

	// Not found
	pub fn not_found(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotFound(ErrorContext::new(msg, source, metadata))
	}

	// Internal error
	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Whether the caller is at fault; such errors are never retried
	pub fn is_client_error(&self) -> bool {
		matches!(
			self,
			Self::ValidationError { .. } | Self::UnknownNetwork(_) | Self::NotFound(_)
		)
	}
}

impl TraceableError for TransactionServiceError {
	fn trace_id(&self) -> String {
		match self {
			Self::ValidationError { context, .. } => context.trace_id.clone(),
			Self::UnknownNetwork(ctx) => ctx.trace_id.clone(),
			Self::NotFound(ctx) => ctx.trace_id.clone(),
			Self::Upstream(err) => err.trace_id(),
			Self::InternalError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
