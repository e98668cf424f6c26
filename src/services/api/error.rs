//! Error responses.
//!
//! Every failure is answered with `{error, message, details?}`. Validation
//! failures (including unknown networks) are 400 with the field errors in
//! `details`, missing records are 404, indexer failures are 502 and anything
//! else is 500.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::{models::ValidationErrors, services::transactions::TransactionServiceError};

/// JSON body of an error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
	pub error: String,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<ValidationErrors>,
}

impl ApiErrorBody {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
			details: None,
		}
	}

	/// 400 body for a rejected request
	pub fn validation(details: ValidationErrors) -> Self {
		Self {
			details: Some(details),
			..Self::new("ValidationError", "Invalid request")
		}
	}
}

impl ResponseError for TransactionServiceError {
	fn status_code(&self) -> StatusCode {
		match self {
			Self::ValidationError { .. } | Self::UnknownNetwork(_) => StatusCode::BAD_REQUEST,
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::Upstream(_) => StatusCode::BAD_GATEWAY,
			Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn error_response(&self) -> HttpResponse {
		let body = match self {
			Self::ValidationError { errors, .. } => ApiErrorBody::validation(errors.clone()),
			Self::UnknownNetwork(ctx) => {
				let mut errors = ValidationErrors::default();
				errors.add_field("network", ctx.message.clone());
				ApiErrorBody::validation(errors)
			}
			Self::NotFound(ctx) => ApiErrorBody::new("NotFound", ctx.message.clone()),
			Self::Upstream(e) => ApiErrorBody::new("UpstreamError", e.to_string()),
			Self::InternalError(ctx) => {
				ApiErrorBody::new("Internal server error", ctx.message.clone())
			}
			Self::Other(e) => ApiErrorBody::new("Internal server error", e.to_string()),
		};

		HttpResponse::build(self.status_code()).json(body)
	}
}
