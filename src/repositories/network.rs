//! Network configuration repository implementation.
//!
//! Starts from the compiled-in catalog and applies JSON overrides from a
//! directory. An override with an existing slug replaces the built-in entry.

#![allow(clippy::result_large_err)]

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
	models::{ConfigLoader, NetworkConfig, NetworkTier},
	repositories::error::RepositoryError,
	utils::{constants::DEFAULT_NETWORKS_PATH, normalize_string},
};

/// Repository for storing and retrieving network configurations
#[derive(Clone)]
pub struct NetworkRepository {
	/// Map of network slugs to their configurations
	pub networks: HashMap<String, NetworkConfig>,
}

impl NetworkRepository {
	/// Loads the built-in catalog plus the overrides found under `path`.
	///
	/// Without a path the default directory is used when it exists; an explicit
	/// path that does not exist is an error.
	pub async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		let networks = Self::load_all(path).await?;
		Ok(NetworkRepository { networks })
	}
}

/// Interface for network repository implementations
#[async_trait]
pub trait NetworkRepositoryTrait: Clone {
	/// Create a new repository instance
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
	where
		Self: Sized;

	/// Load the catalog and overrides, keyed by slug
	async fn load_all(
		path: Option<&Path>,
	) -> Result<HashMap<String, NetworkConfig>, RepositoryError>;

	/// Get a network by exact slug
	fn get(&self, slug: &str) -> Option<NetworkConfig>;

	/// Returns a copy of every network
	fn get_all(&self) -> HashMap<String, NetworkConfig>;
}

fn path_metadata(path: Option<&Path>) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.map_or_else(|| "default".to_string(), |p| p.display().to_string()),
	)]))
}

#[async_trait]
impl NetworkRepositoryTrait for NetworkRepository {
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		NetworkRepository::new(path).await
	}

	async fn load_all(
		path: Option<&Path>,
	) -> Result<HashMap<String, NetworkConfig>, RepositoryError> {
		let mut networks: HashMap<String, NetworkConfig> = NetworkConfig::builtin()
			.map_err(|e| {
				RepositoryError::load_error(
					"Failed to load built-in networks",
					Some(Box::new(e)),
					None,
				)
			})?
			.into_iter()
			.map(|network| (network.slug.clone(), network))
			.collect();

		let override_dir = path.unwrap_or(Path::new(DEFAULT_NETWORKS_PATH));
		if path.is_none() && !override_dir.exists() {
			debug!(
				"No network overrides at {}, using built-in catalog",
				override_dir.display()
			);
			return Ok(networks);
		}

		let overrides: HashMap<String, NetworkConfig> = NetworkConfig::load_all(Some(override_dir))
			.await
			.map_err(|e| {
				RepositoryError::load_error(
					"Failed to load networks",
					Some(Box::new(e)),
					path_metadata(path),
				)
			})?;

		if !overrides.is_empty() {
			info!(
				"Loaded {} network override(s) from {}",
				overrides.len(),
				override_dir.display()
			);
		}
		networks.extend(overrides);

		Ok(networks)
	}

	fn get(&self, slug: &str) -> Option<NetworkConfig> {
		self.networks.get(slug).cloned()
	}

	fn get_all(&self) -> HashMap<String, NetworkConfig> {
		self.networks.clone()
	}
}

/// Service layer for network lookups
#[derive(Clone)]
pub struct NetworkService<T: NetworkRepositoryTrait> {
	repository: T,
}

impl<T: NetworkRepositoryTrait> NetworkService<T> {
	/// Create a new network service with the default repository implementation
	pub async fn new(
		path: Option<&Path>,
	) -> Result<NetworkService<NetworkRepository>, RepositoryError> {
		let repository = NetworkRepository::new(path).await?;
		Ok(NetworkService { repository })
	}

	/// Create a new network service with a custom repository implementation
	pub fn new_with_repository(repository: T) -> Result<Self, RepositoryError> {
		Ok(NetworkService { repository })
	}

	/// Get a network by slug, ignoring case and surrounding whitespace
	pub fn get(&self, slug: &str) -> Option<NetworkConfig> {
		self.repository.get(&normalize_string(slug))
	}

	/// Get a network by chain id.
	///
	/// Several endpoints can serve the same chain; plain endpoints win over trace
	/// endpoints, then the lowest slug wins.
	pub fn get_by_chain_id(&self, chain_id: u64) -> Option<NetworkConfig> {
		self.repository
			.get_all()
			.into_values()
			.filter(|network| network.chain_id == chain_id)
			.min_by(|a, b| {
				a.supports_traces
					.cmp(&b.supports_traces)
					.then_with(|| a.slug.cmp(&b.slug))
			})
	}

	/// Resolves a slug or a decimal chain id.
	pub fn resolve(&self, identifier: &str) -> Option<NetworkConfig> {
		match identifier.trim().parse::<u64>() {
			Ok(chain_id) => self.get_by_chain_id(chain_id),
			Err(_) => self.get(identifier),
		}
	}

	/// Networks of one tier, sorted by slug
	pub fn get_by_tier(&self, tier: NetworkTier) -> Vec<NetworkConfig> {
		let mut networks: Vec<NetworkConfig> = self
			.repository
			.get_all()
			.into_values()
			.filter(|network| network.tier == tier)
			.collect();
		networks.sort_by(|a, b| a.slug.cmp(&b.slug));
		networks
	}

	/// Get all networks
	pub fn get_all(&self) -> HashMap<String, NetworkConfig> {
		self.repository.get_all()
	}

	/// All networks sorted by slug
	pub fn list(&self) -> Vec<NetworkConfig> {
		let mut networks: Vec<NetworkConfig> = self.repository.get_all().into_values().collect();
		networks.sort_by(|a, b| a.slug.cmp(&b.slug));
		networks
	}
}
