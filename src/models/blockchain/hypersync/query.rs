use serde::{Deserialize, Serialize};

/// Transaction columns the indexer can return
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionField {
	Hash,
	From,
	To,
	Value,
	Status,
	Input,
	BlockNumber,
	TransactionIndex,
}

/// Block columns the indexer can return
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockField {
	Number,
	Timestamp,
	Hash,
}

/// How selected rows pull in related rows.
///
/// `JoinAll` returns the blocks of every matched transaction alongside it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum JoinMode {
	#[default]
	Default,
	JoinAll,
	JoinNothing,
}

/// One transaction predicate; fields inside are ANDed, selections are ORed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionSelection {
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub from: Vec<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub to: Vec<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub hash: Vec<String>,
}

impl TransactionSelection {
	pub fn from_address(address: impl Into<String>) -> Self {
		Self {
			from: vec![address.into()],
			..Default::default()
		}
	}

	pub fn to_address(address: impl Into<String>) -> Self {
		Self {
			to: vec![address.into()],
			..Default::default()
		}
	}

	pub fn with_hash(hash: impl Into<String>) -> Self {
		Self {
			hash: vec![hash.into()],
			..Default::default()
		}
	}
}

/// Columns requested per table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSelection {
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub block: Vec<BlockField>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub transaction: Vec<TransactionField>,
}

impl FieldSelection {
	/// Columns needed to build a [`crate::models::Transaction`].
	pub fn transaction_history() -> Self {
		Self {
			block: vec![BlockField::Number, BlockField::Timestamp],
			transaction: vec![
				TransactionField::Hash,
				TransactionField::From,
				TransactionField::To,
				TransactionField::Value,
				TransactionField::Status,
				TransactionField::Input,
				TransactionField::BlockNumber,
			],
		}
	}
}

/// Query posted to the indexer.
///
/// `to_block` is exclusive; `None` means up to the chain head.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Query {
	pub from_block: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to_block: Option<u64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub transactions: Vec<TransactionSelection>,
	pub field_selection: FieldSelection,
	#[serde(default)]
	pub join_mode: JoinMode,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_num_transactions: Option<usize>,
}
