use serde::{Deserialize, Serialize};

/// Execution outcome of a transaction
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
	Success,
	Failed,
}

impl TransactionStatus {
	/// Maps a receipt status code, `1` being success.
	pub fn from_code(code: u64) -> Self {
		if code == 1 {
			TransactionStatus::Success
		} else {
			TransactionStatus::Failed
		}
	}
}

/// A transaction sent or received by the queried wallet.
///
/// Produced per request by joining the indexer's transaction record with the
/// timestamp of its block. Never persisted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	pub hash: String,
	pub from: String,
	/// `None` for contract creations
	pub to: Option<String>,
	/// Transferred amount in wei, as a decimal string
	pub value: String,
	pub status: Option<TransactionStatus>,
	pub input: String,
	pub block_number: u64,
	/// Unix seconds; `None` when the block did not arrive in the same batch
	pub timestamp: Option<u64>,
}

/// A page of transactions returned for one request
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
	pub transactions: Vec<Transaction>,
	/// Number of transactions in this page
	pub total: usize,
	/// Offset to pass as `pageCursor` for the next page
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub next_cursor: Option<u64>,
}

impl TransactionPage {
	pub fn new(transactions: Vec<Transaction>, next_cursor: Option<u64>) -> Self {
		Self {
			total: transactions.len(),
			transactions,
			next_cursor,
		}
	}
}
