use alloy::primitives::U256;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::utils::parse_quantity;

/// Accepts a JSON number, a hex string or a decimal string.
fn deserialize_quantity<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<Value>::deserialize(deserializer)? {
		None | Some(Value::Null) => Ok(None),
		Some(Value::Number(n)) => n
			.as_u64()
			.map(Some)
			.ok_or_else(|| serde::de::Error::custom(format!("invalid quantity: {}", n))),
		Some(Value::String(s)) => parse_quantity(&s)
			.map(Some)
			.map_err(serde::de::Error::custom),
		Some(other) => Err(serde::de::Error::custom(format!(
			"invalid quantity: {}",
			other
		))),
	}
}

/// Keeps big integers as their textual form so no precision is lost.
fn deserialize_big_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<Value>::deserialize(deserializer)? {
		None | Some(Value::Null) => Ok(None),
		Some(Value::Number(n)) => Ok(Some(n.to_string())),
		Some(Value::String(s)) => Ok(Some(s)),
		Some(other) => Err(serde::de::Error::custom(format!(
			"invalid number: {}",
			other
		))),
	}
}

/// Transaction row; every column is optional because only selected fields are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HyperSyncTransaction {
	#[serde(default, deserialize_with = "deserialize_quantity")]
	pub block_number: Option<u64>,
	#[serde(default)]
	pub hash: Option<String>,
	#[serde(default)]
	pub from: Option<String>,
	#[serde(default)]
	pub to: Option<String>,
	#[serde(default, deserialize_with = "deserialize_big_number")]
	pub value: Option<String>,
	#[serde(default, deserialize_with = "deserialize_quantity")]
	pub status: Option<u64>,
	#[serde(default)]
	pub input: Option<String>,
}

impl HyperSyncTransaction {
	/// Value in wei as a decimal string, `"0"` when absent.
	pub fn value_decimal(&self) -> Result<String, String> {
		match self.value.as_deref() {
			None | Some("") => Ok("0".to_string()),
			Some(raw) => U256::from_str(raw)
				.map(|v| v.to_string())
				.map_err(|e| format!("Invalid transaction value '{}': {}", raw, e)),
		}
	}
}

/// Block row
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HyperSyncBlock {
	#[serde(default, deserialize_with = "deserialize_quantity")]
	pub number: Option<u64>,
	#[serde(default, deserialize_with = "deserialize_quantity")]
	pub timestamp: Option<u64>,
}

/// Rows of one batch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseData {
	#[serde(default)]
	pub transactions: Vec<HyperSyncTransaction>,
	#[serde(default)]
	pub blocks: Vec<HyperSyncBlock>,
}

impl ResponseData {
	pub fn is_empty(&self) -> bool {
		self.transactions.is_empty() && self.blocks.is_empty()
	}

	/// Appends `other`, keeping row order.
	pub fn extend(&mut self, other: ResponseData) {
		self.transactions.extend(other.transactions);
		self.blocks.extend(other.blocks);
	}

	/// Reverses row order so the newest rows come first.
	pub fn reverse(&mut self) {
		self.transactions.reverse();
		self.blocks.reverse();
	}
}

/// The indexer sends `data` either as one object or as a list of chunks.
fn deserialize_data<'de, D>(deserializer: D) -> Result<ResponseData, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum DataRepr {
		Chunks(Vec<ResponseData>),
		Single(ResponseData),
	}

	Ok(match Option::<DataRepr>::deserialize(deserializer)? {
		None => ResponseData::default(),
		Some(DataRepr::Single(data)) => data,
		Some(DataRepr::Chunks(chunks)) => {
			chunks
				.into_iter()
				.fold(ResponseData::default(), |mut acc, chunk| {
					acc.extend(chunk);
					acc
				})
		}
	})
}

/// One answer to a [`super::Query`].
///
/// `next_block` is where the following request should start; when it reaches the
/// query's `to_block` (or the archive height) the range is exhausted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResponse {
	#[serde(default, deserialize_with = "deserialize_data")]
	pub data: ResponseData,
	pub next_block: u64,
	#[serde(default, deserialize_with = "deserialize_quantity")]
	pub archive_height: Option<u64>,
}
