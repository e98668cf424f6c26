//! Request handlers.

use actix_web::{web, HttpResponse, Responder};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::error;

use crate::{
	models::{
		is_transaction_hash, NetworkConfig, NetworkTier, RawTransactionParams, Transaction,
		TransactionPage, ValidationErrors,
	},
	repositories::NetworkRepositoryTrait,
	services::{blockchain::ClientPoolTrait, transactions::TransactionService},
	utils::metrics::{gather_metrics, update_network_metrics, update_system_metrics},
};

use super::ApiErrorBody;

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
	pub status: String,
	pub timestamp: String,
}

/// Body of a successful wallet history request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
	pub success: bool,
	pub wallet: String,
	pub network: String,
	#[serde(flatten)]
	pub page: TransactionPage,
}

/// Body of a successful single transaction lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionResponse {
	pub success: bool,
	pub transaction: Transaction,
}

/// Body of `GET /api/networks`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworksResponse {
	pub success: bool,
	pub networks: Vec<NetworkConfig>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NetworksParams {
	tier: Option<String>,
}

pub(super) async fn health() -> impl Responder {
	HttpResponse::Ok().json(HealthResponse {
		status: "OK".to_string(),
		timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
	})
}

async fn wallet_history<N, P>(
	service: &TransactionService<N, P>,
	params: RawTransactionParams,
) -> Result<HttpResponse, actix_web::Error>
where
	N: NetworkRepositoryTrait,
	P: ClientPoolTrait,
{
	let query = service.validate(params)?;
	let page = service.get_wallet_transactions(&query).await?;

	Ok(HttpResponse::Ok().json(TransactionsResponse {
		success: true,
		wallet: query.wallet_lowercase(),
		network: query.network,
		page,
	}))
}

/// `GET /api/transactions?wallet=...`
pub(super) async fn get_transactions<N, P>(
	service: web::Data<TransactionService<N, P>>,
	params: web::Query<RawTransactionParams>,
) -> Result<HttpResponse, actix_web::Error>
where
	N: NetworkRepositoryTrait + 'static,
	P: ClientPoolTrait + 'static,
{
	wallet_history(&service, params.into_inner()).await
}

/// `GET /api/transactions/{wallet_or_hash}`
///
/// A 66 character path segment is a transaction hash; anything else is treated
/// as a wallet and validated as such.
pub(super) async fn get_by_path<N, P>(
	service: web::Data<TransactionService<N, P>>,
	path: web::Path<String>,
	params: web::Query<RawTransactionParams>,
) -> Result<HttpResponse, actix_web::Error>
where
	N: NetworkRepositoryTrait + 'static,
	P: ClientPoolTrait + 'static,
{
	let segment = path.into_inner();
	let params = params.into_inner();

	if is_transaction_hash(&segment) {
		let transaction = service
			.get_transaction_by_hash(&segment, params.network.as_deref())
			.await?;
		return Ok(HttpResponse::Ok().json(TransactionResponse {
			success: true,
			transaction,
		}));
	}

	let params = RawTransactionParams {
		wallet: Some(segment),
		..params
	};
	wallet_history(&service, params).await
}

/// `GET /api/networks[?tier=gold]`
pub(super) async fn get_networks<N, P>(
	service: web::Data<TransactionService<N, P>>,
	params: web::Query<NetworksParams>,
) -> HttpResponse
where
	N: NetworkRepositoryTrait + 'static,
	P: ClientPoolTrait + 'static,
{
	let networks = match params.tier.as_deref() {
		None => service.networks().list(),
		Some(tier) => match NetworkTier::from_str(tier) {
			Ok(tier) => service.networks().get_by_tier(tier),
			Err(e) => {
				let mut errors = ValidationErrors::default();
				errors.add_field("tier", e);
				return HttpResponse::BadRequest().json(ApiErrorBody::validation(errors));
			}
		},
	};

	HttpResponse::Ok().json(NetworksResponse {
		success: true,
		networks,
	})
}

/// `GET /metrics`
pub(super) async fn metrics<N, P>(service: web::Data<TransactionService<N, P>>) -> HttpResponse
where
	N: NetworkRepositoryTrait + 'static,
	P: ClientPoolTrait + 'static,
{
	update_system_metrics();
	update_network_metrics(&service.networks().list());

	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}
