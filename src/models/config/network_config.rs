//! Network configuration loading and validation.
//!
//! The built-in catalog is compiled from `networks.json`; override files use the
//! same shape, one network per file.

use async_trait::async_trait;
use std::{collections::HashMap, path::Path};
use tracing::warn;
use url::Url;

use crate::{
	models::{config::error::ConfigError, ConfigLoader, NetworkConfig},
	utils::{constants::DEFAULT_NETWORKS_PATH, normalize_string},
};

const BUILTIN_NETWORKS: &str = include_str!("networks.json");

impl NetworkConfig {
	/// Parses and validates the compiled-in network catalog.
	pub fn builtin() -> Result<Vec<NetworkConfig>, ConfigError> {
		let networks: Vec<NetworkConfig> = serde_json::from_str(BUILTIN_NETWORKS).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse built-in network catalog: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;

		for network in &networks {
			network.validate()?;
		}

		Ok(networks)
	}

	/// Case-insensitive slug comparison.
	pub fn matches_slug(&self, slug: &str) -> bool {
		self.slug == normalize_string(slug)
	}
}

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

#[async_trait]
impl ConfigLoader for NetworkConfig {
	/// Load all network overrides from a directory
	///
	/// Entries are keyed by slug, not by file name.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let network_dir = path.unwrap_or(Path::new(DEFAULT_NETWORKS_PATH));
		let mut pairs: Vec<(String, NetworkConfig)> = Vec::new();

		if !network_dir.exists() {
			return Err(ConfigError::file_error(
				"networks directory not found",
				None,
				path_metadata(network_dir),
			));
		}

		let entries = std::fs::read_dir(network_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read networks directory: {}", e),
				Some(Box::new(e)),
				path_metadata(network_dir),
			)
		})?;

		for entry in entries {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					path_metadata(network_dir),
				)
			})?;
			let path = entry.path();

			if !Self::is_json_file(&path) {
				continue;
			}

			let network = Self::load_from_path(&path).await?;

			let existing: Vec<&NetworkConfig> = pairs.iter().map(|(_, n)| n).collect();
			Self::validate_uniqueness(&existing, &network, &path.display().to_string())?;

			pairs.push((network.slug.clone(), network));
		}

		Ok(T::from_iter(pairs))
	}

	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open network config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		let config: NetworkConfig = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse network config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		config.validate()?;

		Ok(config)
	}

	/// Ensures that:
	/// - name and slug are present, slug uses lowercase letters, digits and `-`
	/// - chain id is non-zero
	/// - url is an absolute http(s) URL
	fn validate(&self) -> Result<(), ConfigError> {
		if self.name.trim().is_empty() {
			return Err(ConfigError::validation_error(
				"Network name is required",
				None,
				None,
			));
		}

		if self.slug.is_empty()
			|| !self
				.slug
				.chars()
				.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
		{
			return Err(ConfigError::validation_error(
				"Slug must contain only lowercase letters, numbers, and dashes",
				None,
				Some(HashMap::from([("slug".to_string(), self.slug.clone())])),
			));
		}

		if self.chain_id == 0 {
			return Err(ConfigError::validation_error(
				"Chain id must be greater than zero",
				None,
				Some(HashMap::from([("slug".to_string(), self.slug.clone())])),
			));
		}

		match Url::parse(&self.url) {
			Ok(url) if url.scheme() == "https" => Ok(()),
			Ok(url) if url.scheme() == "http" => {
				let local = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
				if !local {
					warn!(
						"Network '{}' uses an insecure indexer URL: {}",
						self.slug, self.url
					);
				}
				Ok(())
			}
			Ok(_) => Err(ConfigError::validation_error(
				"Network URL must use http or https",
				None,
				Some(HashMap::from([("url".to_string(), self.url.clone())])),
			)),
			Err(e) => Err(ConfigError::validation_error(
				format!("Invalid network URL: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), self.url.clone())])),
			)),
		}
	}

	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		if instances.iter().any(|n| n.slug == current_instance.slug) {
			return Err(ConfigError::validation_error(
				format!("Duplicate network slug found: '{}'", current_instance.slug),
				None,
				Some(HashMap::from([
					("slug".to_string(), current_instance.slug.clone()),
					("path".to_string(), file_path.to_string()),
				])),
			));
		}
		Ok(())
	}
}
