//! API server construction.

use actix_web::{
	dev::{Service, ServiceRequest},
	middleware::{Compress, DefaultHeaders, NormalizePath},
	web, App, HttpServer,
};
use futures::FutureExt;
use std::sync::Arc;
use tracing::info;

use crate::{
	repositories::NetworkRepositoryTrait,
	services::{api::handlers, blockchain::ClientPoolTrait, transactions::TransactionService},
	utils::metrics::record_request,
};

/// Registers every API route on `cfg`.
///
/// The [`TransactionService`] must be registered as app data by the caller.
pub fn configure_routes<N, P>(cfg: &mut web::ServiceConfig)
where
	N: NetworkRepositoryTrait + Send + Sync + 'static,
	P: ClientPoolTrait + 'static,
{
	cfg.route("/", web::get().to(handlers::health))
		.route(
			"/api/transactions",
			web::get().to(handlers::get_transactions::<N, P>),
		)
		.route(
			"/api/transactions/{wallet_or_hash}",
			web::get().to(handlers::get_by_path::<N, P>),
		)
		.route("/api/networks", web::get().to(handlers::get_networks::<N, P>))
		.route("/metrics", web::get().to(handlers::metrics::<N, P>));
}

fn route_label(req: &ServiceRequest) -> String {
	req.match_pattern()
		.unwrap_or_else(|| "unmatched".to_string())
}

/// Creates the API server bound to `bind_address`
pub fn create_api_server<N, P>(
	bind_address: String,
	service: Arc<TransactionService<N, P>>,
) -> std::io::Result<actix_web::dev::Server>
where
	N: NetworkRepositoryTrait + Send + Sync + 'static,
	P: ClientPoolTrait + 'static,
{
	info!("Starting API server on {}", bind_address);

	Ok(HttpServer::new(move || {
		App::new()
			.wrap_fn(|req, srv| {
				let route = route_label(&req);
				srv.call(req).map(move |res| {
					if let Ok(response) = &res {
						record_request(&route, response.status().as_u16());
					}
					res
				})
			})
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.wrap(DefaultHeaders::new())
			.app_data(web::Data::from(service.clone()))
			.configure(configure_routes::<N, P>)
	})
	.bind(bind_address)?
	.shutdown_timeout(5)
	.run())
}
