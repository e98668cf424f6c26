//! Test helper utilities for indexer batches
//!
//! - `HyperSyncTransactionBuilder`: one transaction row
//! - `BatchBuilder`: a [`QueryResponse`] with transactions and their blocks

use crate::models::{HyperSyncBlock, HyperSyncTransaction, QueryResponse, ResponseData};

/// Builder for creating test HyperSyncTransaction rows
pub struct HyperSyncTransactionBuilder {
	tx: HyperSyncTransaction,
}

impl Default for HyperSyncTransactionBuilder {
	fn default() -> Self {
		Self {
			tx: HyperSyncTransaction {
				block_number: Some(1),
				hash: Some(format!("0x{}", "00".repeat(32))),
				from: Some("0x742d35cc6634c0532925a3b8d375af0f4123c976".to_string()),
				to: Some("0x0000000000000000000000000000000000000001".to_string()),
				value: Some("0x0".to_string()),
				status: Some(1),
				input: Some("0x".to_string()),
			},
		}
	}
}

impl HyperSyncTransactionBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn block_number(mut self, block_number: u64) -> Self {
		self.tx.block_number = Some(block_number);
		self
	}

	pub fn hash(mut self, hash: &str) -> Self {
		self.tx.hash = Some(hash.to_string());
		self
	}

	/// Hash derived from `n`, unique per value
	pub fn hash_from(mut self, n: u64) -> Self {
		self.tx.hash = Some(format!("0x{:064x}", n));
		self
	}

	pub fn from(mut self, from: &str) -> Self {
		self.tx.from = Some(from.to_string());
		self
	}

	pub fn to(mut self, to: Option<&str>) -> Self {
		self.tx.to = to.map(str::to_string);
		self
	}

	pub fn value(mut self, value: &str) -> Self {
		self.tx.value = Some(value.to_string());
		self
	}

	pub fn status(mut self, status: Option<u64>) -> Self {
		self.tx.status = status;
		self
	}

	pub fn input(mut self, input: &str) -> Self {
		self.tx.input = Some(input.to_string());
		self
	}

	pub fn build(self) -> HyperSyncTransaction {
		self.tx
	}
}

/// Builder for creating test QueryResponse batches
#[derive(Default)]
pub struct BatchBuilder {
	data: ResponseData,
	next_block: u64,
	archive_height: Option<u64>,
}

impl BatchBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn transaction(mut self, tx: HyperSyncTransaction) -> Self {
		self.data.transactions.push(tx);
		self
	}

	pub fn block(mut self, number: u64, timestamp: u64) -> Self {
		self.data.blocks.push(HyperSyncBlock {
			number: Some(number),
			timestamp: Some(timestamp),
		});
		self
	}

	pub fn next_block(mut self, next_block: u64) -> Self {
		self.next_block = next_block;
		self
	}

	pub fn archive_height(mut self, archive_height: u64) -> Self {
		self.archive_height = Some(archive_height);
		self
	}

	pub fn build(self) -> QueryResponse {
		QueryResponse {
			data: self.data,
			next_block: self.next_block,
			archive_height: self.archive_height,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_batch_builder() {
		let batch = BatchBuilder::new()
			.transaction(
				HyperSyncTransactionBuilder::new()
					.block_number(5)
					.hash_from(7)
					.build(),
			)
			.block(5, 1_700_000_000)
			.next_block(6)
			.build();

		assert_eq!(batch.next_block, 6);
		assert_eq!(batch.data.transactions[0].block_number, Some(5));
		assert_eq!(
			batch.data.transactions[0].hash.as_deref(),
			Some(format!("0x{:064x}", 7).as_str())
		);
		assert_eq!(batch.data.blocks[0].timestamp, Some(1_700_000_000));
	}
}
