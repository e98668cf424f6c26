use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Indexer service level of a network.
///
/// Accepts the lowercase names as well as the emoji labels used by the hosted
/// network list.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum NetworkTier {
	#[serde(alias = "🏅")]
	Gold,
	#[serde(alias = "🥈")]
	Silver,
	#[serde(alias = "🥉")]
	Bronze,
	#[serde(alias = "🪨")]
	Stone,
	#[serde(alias = "🎒")]
	Testnet,
}

impl NetworkTier {
	pub const ALL: [NetworkTier; 5] = [
		NetworkTier::Gold,
		NetworkTier::Silver,
		NetworkTier::Bronze,
		NetworkTier::Stone,
		NetworkTier::Testnet,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			NetworkTier::Gold => "gold",
			NetworkTier::Silver => "silver",
			NetworkTier::Bronze => "bronze",
			NetworkTier::Stone => "stone",
			NetworkTier::Testnet => "testnet",
		}
	}

	fn emoji(&self) -> &'static str {
		match self {
			NetworkTier::Gold => "🏅",
			NetworkTier::Silver => "🥈",
			NetworkTier::Bronze => "🥉",
			NetworkTier::Stone => "🪨",
			NetworkTier::Testnet => "🎒",
		}
	}
}

impl fmt::Display for NetworkTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NetworkTier {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		NetworkTier::ALL
			.into_iter()
			.find(|tier| tier.as_str().eq_ignore_ascii_case(trimmed) || tier.emoji() == trimmed)
			.ok_or_else(|| format!("Unknown network tier: '{}'", s))
	}
}

/// Connection details for one indexed network.
///
/// Immutable once loaded; looked up by slug or chain id.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
	/// Unique identifier, e.g. `ethereum` or `arbitrum-sepolia`
	pub slug: String,

	/// Human-readable name
	pub name: String,

	/// Numeric EVM chain id
	pub chain_id: u64,

	/// Base URL of the indexer endpoint for this network
	pub url: String,

	pub tier: NetworkTier,

	/// Whether the endpoint also serves trace data
	#[serde(default)]
	pub supports_traces: bool,
}
