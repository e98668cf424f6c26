use serde::{Deserialize, Serialize};

/// Native currency of a chain as a wallet expects it
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NativeCurrency {
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
}

/// Chain description handed to a wallet when switching or adding a chain.
///
/// Serializes to the `wallet_addEthereumChain` parameter shape; `network` is
/// the backend slug used when fetching transactions and is not sent to wallets.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
	/// Hex chain id, e.g. `0x1`
	pub chain_id: String,
	pub chain_name: String,
	#[serde(skip_serializing, default)]
	pub network: String,
	pub native_currency: NativeCurrency,
	pub rpc_urls: Vec<String>,
	pub block_explorer_urls: Vec<String>,
}

impl ChainInfo {
	/// Numeric form of the hex chain id
	pub fn chain_id_number(&self) -> Option<u64> {
		let hex = self.chain_id.strip_prefix("0x")?;
		u64::from_str_radix(hex, 16).ok()
	}
}

fn chain(
	chain_id: &str,
	chain_name: &str,
	network: &str,
	currency: (&str, &str),
	rpc_url: &str,
	explorer_url: &str,
) -> ChainInfo {
	ChainInfo {
		chain_id: chain_id.to_string(),
		chain_name: chain_name.to_string(),
		network: network.to_string(),
		native_currency: NativeCurrency {
			name: currency.0.to_string(),
			symbol: currency.1.to_string(),
			decimals: 18,
		},
		rpc_urls: vec![rpc_url.to_string()],
		block_explorer_urls: vec![explorer_url.to_string()],
	}
}

/// Chains offered to wallet users, the first one being the default.
pub fn default_chains() -> Vec<ChainInfo> {
	vec![
		chain(
			"0x1",
			"Ethereum Mainnet",
			"ethereum",
			("Ethereum", "ETH"),
			"https://mainnet.infura.io/v3/",
			"https://etherscan.io/",
		),
		chain(
			"0x89",
			"Polygon Mainnet",
			"polygon",
			("MATIC", "MATIC"),
			"https://polygon-rpc.com/",
			"https://polygonscan.com/",
		),
		chain(
			"0xa4b1",
			"Arbitrum One",
			"arbitrum",
			("Ethereum", "ETH"),
			"https://arb1.arbitrum.io/rpc",
			"https://arbiscan.io/",
		),
		chain(
			"0x38",
			"Binance Smart Chain",
			"bsc",
			("Binance Coin", "BNB"),
			"https://bsc-dataseed.binance.org/",
			"https://bscscan.com/",
		),
	]
}

/// Finds a chain by hex id, ignoring case.
pub fn find_chain<'a>(chains: &'a [ChainInfo], chain_id: &str) -> Option<&'a ChainInfo> {
	chains
		.iter()
		.find(|chain| chain.chain_id.eq_ignore_ascii_case(chain_id))
}
