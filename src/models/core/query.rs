//! Request parameters for the transaction history endpoint.
//!
//! [`RawTransactionParams`] is what arrives on the query string; validation turns
//! it into a [`TransactionQuery`] or a [`ValidationErrors`] listing every problem
//! found, keyed by parameter name.

use alloy::primitives::Address;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::utils::{
	constants::{DEFAULT_NETWORK, MAX_PAGE_LIMIT},
	normalize_string,
};

lazy_static! {
	static ref WALLET_PATTERN: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
	static ref HASH_PATTERN: Regex = Regex::new(r"^0x[0-9a-fA-F]{64}$").unwrap();
}

/// Returns true when `value` is `0x` followed by 40 hex characters.
pub fn is_wallet_address(value: &str) -> bool {
	WALLET_PATTERN.is_match(value)
}

/// Returns true when `value` is `0x` followed by 64 hex characters.
pub fn is_transaction_hash(value: &str) -> bool {
	HASH_PATTERN.is_match(value)
}

/// Unvalidated query-string parameters
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionParams {
	pub wallet: Option<String>,
	pub network: Option<String>,
	pub from_block: Option<String>,
	pub to_block: Option<String>,
	pub limit: Option<String>,
	pub page_cursor: Option<String>,
}

/// Validated, normalized transaction history request.
///
/// Invariant: `from_block <= to_block` when both are set, `limit` is in `1..=100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
	pub wallet: Address,
	/// Lowercased network slug
	pub network: String,
	pub from_block: Option<u64>,
	/// Inclusive upper bound
	pub to_block: Option<u64>,
	pub limit: Option<u16>,
	/// Number of matching transactions to skip
	pub page_cursor: Option<u64>,
}

impl TransactionQuery {
	pub fn new(wallet: Address, network: impl Into<String>) -> Self {
		Self {
			wallet,
			network: normalize_string(&network.into()),
			from_block: None,
			to_block: None,
			limit: None,
			page_cursor: None,
		}
	}

	/// Wallet as a lowercase `0x` hex string, the form the indexer matches on.
	pub fn wallet_lowercase(&self) -> String {
		self.wallet.to_string().to_lowercase()
	}
}

/// Structured rejection of a request, serialized as
/// `{"fieldErrors": {...}, "formErrors": [...]}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
	pub field_errors: BTreeMap<String, Vec<String>>,
	pub form_errors: Vec<String>,
}

impl ValidationErrors {
	pub fn is_empty(&self) -> bool {
		self.field_errors.is_empty() && self.form_errors.is_empty()
	}

	pub fn add_field(&mut self, field: &str, message: impl Into<String>) {
		self.field_errors
			.entry(field.to_string())
			.or_default()
			.push(message.into());
	}

	pub fn add_form(&mut self, message: impl Into<String>) {
		self.form_errors.push(message.into());
	}

	/// Whether `field` has at least one error
	pub fn has_field(&self, field: &str) -> bool {
		self.field_errors.contains_key(field)
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut parts: Vec<String> = self
			.field_errors
			.iter()
			.map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
			.collect();
		parts.extend(self.form_errors.iter().cloned());
		write!(f, "Invalid request: {}", parts.join("; "))
	}
}

impl std::error::Error for ValidationErrors {}

fn parse_non_negative(
	errors: &mut ValidationErrors,
	field: &str,
	value: Option<&str>,
) -> Option<u64> {
	let value = value?.trim();
	match value.parse::<u64>() {
		Ok(parsed) => Some(parsed),
		Err(_) => {
			errors.add_field(field, "Expected a non-negative integer");
			None
		}
	}
}

fn parse_limit(errors: &mut ValidationErrors, value: Option<&str>) -> Option<u16> {
	let value = value?.trim();
	match value.parse::<i64>() {
		Ok(parsed) if parsed < 1 => {
			errors.add_field("limit", "Number must be greater than or equal to 1");
			None
		}
		Ok(parsed) if parsed > MAX_PAGE_LIMIT as i64 => {
			errors.add_field(
				"limit",
				format!("Number must be less than or equal to {}", MAX_PAGE_LIMIT),
			);
			None
		}
		Ok(parsed) => Some(parsed as u16),
		Err(_) => {
			errors.add_field("limit", "Expected an integer");
			None
		}
	}
}

impl RawTransactionParams {
	/// Validates every parameter, using `default_network` when none is given.
	///
	/// All problems are collected before returning so the caller sees them at once.
	pub fn validate(self, default_network: &str) -> Result<TransactionQuery, ValidationErrors> {
		let mut errors = ValidationErrors::default();

		let wallet = match self.wallet.as_deref().map(str::trim) {
			None | Some("") => {
				errors.add_field("wallet", "Required");
				None
			}
			Some(value) if !is_wallet_address(value) => {
				errors.add_field("wallet", "Invalid wallet address format");
				None
			}
			Some(value) => match Address::from_str(value) {
				Ok(address) => Some(address),
				Err(e) => {
					errors.add_field("wallet", format!("Invalid wallet address: {}", e));
					None
				}
			},
		};

		let network = match self.network.as_deref().map(normalize_string) {
			Some(network) if network.is_empty() => {
				errors.add_field("network", "Network must not be empty");
				String::new()
			}
			Some(network) => network,
			None => normalize_string(default_network),
		};

		let from_block = parse_non_negative(&mut errors, "fromBlock", self.from_block.as_deref());
		let to_block = parse_non_negative(&mut errors, "toBlock", self.to_block.as_deref());
		let limit = parse_limit(&mut errors, self.limit.as_deref());
		let page_cursor =
			parse_non_negative(&mut errors, "pageCursor", self.page_cursor.as_deref());

		if let (Some(from), Some(to)) = (from_block, to_block) {
			if from > to {
				errors.add_field("toBlock", "toBlock must be >= fromBlock");
			}
		}

		match wallet {
			Some(wallet) if errors.is_empty() => Ok(TransactionQuery {
				wallet,
				network,
				from_block,
				to_block,
				limit,
				page_cursor,
			}),
			_ => Err(errors),
		}
	}
}

impl TryFrom<RawTransactionParams> for TransactionQuery {
	type Error = ValidationErrors;

	fn try_from(params: RawTransactionParams) -> Result<Self, Self::Error> {
		params.validate(DEFAULT_NETWORK)
	}
}
