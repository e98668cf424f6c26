//! Bootstrap module for wiring the services behind the HTTP API.
//!
//! Settings come from the environment (after the CLI has applied its flags
//! onto it). [`initialize_services`] loads the network catalog, creates the
//! indexer client pool and returns the [`TransactionService`] the API serves.

use std::{
	env::var,
	error::Error,
	path::PathBuf,
	sync::Arc,
};
use tracing::{info, warn};

use crate::{
	repositories::{NetworkRepositoryTrait, NetworkService},
	services::{blockchain::ClientPool, transactions::TransactionService},
	utils::{
		constants::{DEFAULT_HOST, DEFAULT_NETWORK, DEFAULT_PORT},
		normalize_string, RetryConfig,
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Process settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
	pub host: String,
	pub port: u16,
	/// Directory with network overrides; `None` uses the default location
	pub networks_path: Option<PathBuf>,
	pub default_network: String,
	/// Bearer token for the HyperSync API
	pub hypersync_token: Option<String>,
	pub retry_config: RetryConfig,
}

impl Default for ServiceSettings {
	fn default() -> Self {
		Self {
			host: DEFAULT_HOST.to_string(),
			port: DEFAULT_PORT,
			networks_path: None,
			default_network: DEFAULT_NETWORK.to_string(),
			hypersync_token: None,
			retry_config: RetryConfig::default(),
		}
	}
}

impl ServiceSettings {
	/// Reads `HOST`, `PORT`, `NETWORKS_PATH`, `DEFAULT_NETWORK` and
	/// `HYPERSYNC_API_TOKEN`
	pub fn from_env() -> Self {
		let defaults = Self::default();

		let port = match var("PORT") {
			Ok(port) => port.parse().unwrap_or_else(|_| {
				warn!("Invalid PORT '{}', using {}", port, DEFAULT_PORT);
				DEFAULT_PORT
			}),
			Err(_) => defaults.port,
		};

		Self {
			host: non_empty_var("HOST").unwrap_or(defaults.host),
			port,
			networks_path: non_empty_var("NETWORKS_PATH").map(PathBuf::from),
			default_network: non_empty_var("DEFAULT_NETWORK")
				.map(|network| normalize_string(&network))
				.unwrap_or(defaults.default_network),
			hypersync_token: non_empty_var("HYPERSYNC_API_TOKEN"),
			retry_config: defaults.retry_config,
		}
	}

	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}
}

fn non_empty_var(key: &str) -> Option<String> {
	var(key)
		.ok()
		.map(|value| value.trim().to_string())
		.filter(|value| !value.is_empty())
}

/// Initializes the transaction service and its dependencies.
///
/// # Arguments
/// * `network_service` - Preloaded network service; loaded from `settings.networks_path` when `None`
/// * `settings` - Process settings
///
/// # Errors
/// Returns an error if the network catalog cannot be loaded or does not
/// contain the default network
pub async fn initialize_services<N>(
	network_service: Option<NetworkService<N>>,
	settings: &ServiceSettings,
) -> Result<Arc<TransactionService<N, ClientPool>>>
where
	N: NetworkRepositoryTrait + Send + Sync + 'static,
{
	let network_service = match network_service {
		Some(service) => service,
		None => {
			let repository = N::new(settings.networks_path.as_deref()).await?;
			NetworkService::<N>::new_with_repository(repository)?
		}
	};

	if network_service.get(&settings.default_network).is_none() {
		return Err(format!(
			"Default network '{}' is not configured",
			settings.default_network
		)
		.into());
	}

	info!(
		"Loaded {} network(s), default network: {}",
		network_service.get_all().len(),
		settings.default_network
	);
	if settings.hypersync_token.is_none() {
		warn!("HYPERSYNC_API_TOKEN is not set; requests to the indexer are unauthenticated");
	}

	let client_pool = Arc::new(ClientPool::new(
		settings.retry_config.clone(),
		settings.hypersync_token.clone(),
	));

	Ok(Arc::new(
		TransactionService::new(Arc::new(network_service), client_pool)
			.with_default_network(settings.default_network.clone()),
	))
}
