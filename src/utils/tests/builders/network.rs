//! Test helper utilities for network configuration
//!
//! - `NetworkBuilder`: Builder for creating test NetworkConfig instances

use crate::models::{NetworkConfig, NetworkTier};

/// Builder for creating test NetworkConfig instances
pub struct NetworkBuilder {
	slug: String,
	name: String,
	chain_id: u64,
	url: String,
	tier: NetworkTier,
	supports_traces: bool,
}

impl Default for NetworkBuilder {
	fn default() -> Self {
		Self {
			slug: "test-network".to_string(),
			name: "Test Network".to_string(),
			chain_id: 1,
			url: "https://test.hypersync.xyz".to_string(),
			tier: NetworkTier::Gold,
			supports_traces: false,
		}
	}
}

impl NetworkBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn slug(mut self, slug: &str) -> Self {
		self.slug = slug.to_string();
		self
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn url(mut self, url: &str) -> Self {
		self.url = url.to_string();
		self
	}

	pub fn tier(mut self, tier: NetworkTier) -> Self {
		self.tier = tier;
		self
	}

	pub fn supports_traces(mut self, supports_traces: bool) -> Self {
		self.supports_traces = supports_traces;
		self
	}

	pub fn build(self) -> NetworkConfig {
		NetworkConfig {
			slug: self.slug,
			name: self.name,
			chain_id: self.chain_id,
			url: self.url,
			tier: self.tier,
			supports_traces: self.supports_traces,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_network() {
		let network = NetworkBuilder::new().build();

		assert_eq!(network.slug, "test-network");
		assert_eq!(network.chain_id, 1);
		assert_eq!(network.tier, NetworkTier::Gold);
		assert!(!network.supports_traces);
	}

	#[test]
	fn test_custom_network() {
		let network = NetworkBuilder::new()
			.slug("gnosis-traces")
			.name("Gnosis Traces")
			.chain_id(100)
			.url("https://gnosis-traces.hypersync.xyz")
			.tier(NetworkTier::Bronze)
			.supports_traces(true)
			.build();

		assert_eq!(network.slug, "gnosis-traces");
		assert_eq!(network.name, "Gnosis Traces");
		assert_eq!(network.chain_id, 100);
		assert_eq!(network.url, "https://gnosis-traces.hypersync.xyz");
		assert_eq!(network.tier, NetworkTier::Bronze);
		assert!(network.supports_traces);
	}
}
