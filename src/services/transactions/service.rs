//! Transaction history service.
//!
//! A wallet query becomes two indexer selections (wallet as sender, wallet as
//! recipient) joined with their blocks. The stream is consumed newest first;
//! each batch is resolved against the blocks delivered in that same batch, so a
//! transaction whose block arrives in another batch has no timestamp.

use std::{collections::HashMap, sync::Arc};
use tracing::instrument;

use crate::{
	models::{
		is_transaction_hash, FieldSelection, HyperSyncTransaction, JoinMode, NetworkConfig, Query,
		QueryResponse, RawTransactionParams, Transaction, TransactionPage, TransactionQuery,
		TransactionSelection, TransactionStatus, ValidationErrors,
	},
	repositories::{NetworkRepositoryTrait, NetworkService},
	services::{
		blockchain::{BlockChainError, ClientPoolTrait, StreamConfig, TransactionStream},
		transactions::TransactionServiceError,
	},
	utils::{
		constants::{DEFAULT_FROM_BLOCK, DEFAULT_NETWORK, DEFAULT_REVERSE_WINDOW},
		metrics::TRANSACTIONS_RETURNED,
		normalize_string,
	},
};

/// Builds the indexer query for a validated wallet request.
///
/// The request range is inclusive while the indexer's `to_block` is exclusive,
/// hence the `+ 1`. Without `from_block` the scan starts at block 1.
pub fn build_wallet_query(query: &TransactionQuery) -> Query {
	let wallet = query.wallet_lowercase();

	Query {
		from_block: query.from_block.unwrap_or(DEFAULT_FROM_BLOCK),
		to_block: query.to_block.map(|to| to.saturating_add(1)),
		transactions: vec![
			TransactionSelection::from_address(wallet.clone()),
			TransactionSelection::to_address(wallet),
		],
		field_selection: FieldSelection::transaction_history(),
		join_mode: JoinMode::JoinAll,
		max_num_transactions: None,
	}
}

/// Builds the indexer query for a single transaction hash over the whole chain.
pub fn build_hash_query(hash: &str) -> Query {
	Query {
		from_block: 0,
		to_block: None,
		transactions: vec![TransactionSelection::with_hash(hash.to_lowercase())],
		field_selection: FieldSelection::transaction_history(),
		join_mode: JoinMode::JoinAll,
		max_num_transactions: Some(1),
	}
}

fn to_transaction(
	tx: HyperSyncTransaction,
	timestamps: &HashMap<u64, u64>,
) -> Result<Transaction, BlockChainError> {
	let value = tx.value_decimal().map_err(|e| {
		BlockChainError::request_error(
			e,
			None,
			tx.hash
				.as_ref()
				.map(|hash| HashMap::from([("hash".to_string(), hash.clone())])),
		)
	})?;
	let block_number = tx.block_number.unwrap_or_default();

	Ok(Transaction {
		hash: tx.hash.unwrap_or_default(),
		from: tx.from.unwrap_or_default(),
		to: tx.to,
		value,
		status: tx.status.map(TransactionStatus::from_code),
		input: tx.input.unwrap_or_default(),
		block_number,
		timestamp: timestamps.get(&block_number).copied(),
	})
}

/// Resolves every transaction of `batch` against the blocks of the same batch
/// and appends them in delivery order.
pub(crate) fn append_batch(
	batch: QueryResponse,
	records: &mut Vec<Transaction>,
) -> Result<(), BlockChainError> {
	let timestamps: HashMap<u64, u64> = batch
		.data
		.blocks
		.iter()
		.filter_map(|block| Some((block.number?, block.timestamp?)))
		.collect();

	for tx in batch.data.transactions {
		records.push(to_transaction(tx, &timestamps)?);
	}
	Ok(())
}

/// Pulls batches until the stream ends or `wanted` records are collected.
async fn collect_stream(
	stream: &mut dyn TransactionStream,
	wanted: Option<usize>,
) -> Result<Vec<Transaction>, BlockChainError> {
	let mut records = Vec::new();
	while let Some(batch) = stream.recv().await? {
		append_batch(batch, &mut records)?;
		if wanted.is_some_and(|wanted| records.len() >= wanted) {
			break;
		}
	}
	Ok(records)
}

/// Cuts `[cursor, cursor + limit)` out of `records`.
///
/// `next_cursor` is only set when records beyond the page were seen.
fn paginate(records: Vec<Transaction>, cursor: u64, limit: Option<u16>) -> TransactionPage {
	let start = usize::try_from(cursor).unwrap_or(usize::MAX).min(records.len());
	let end = match limit {
		Some(limit) => start.saturating_add(limit as usize).min(records.len()),
		None => records.len(),
	};
	let next_cursor = (limit.is_some() && records.len() > end).then_some(end as u64);

	let transactions = records.into_iter().skip(start).take(end - start).collect();
	TransactionPage::new(transactions, next_cursor)
}

/// Service answering transaction history requests
pub struct TransactionService<N: NetworkRepositoryTrait, P: ClientPoolTrait> {
	networks: Arc<NetworkService<N>>,
	client_pool: Arc<P>,
	default_network: String,
	reverse_window: u64,
}

impl<N: NetworkRepositoryTrait, P: ClientPoolTrait> TransactionService<N, P> {
	pub fn new(networks: Arc<NetworkService<N>>, client_pool: Arc<P>) -> Self {
		Self {
			networks,
			client_pool,
			default_network: DEFAULT_NETWORK.to_string(),
			reverse_window: DEFAULT_REVERSE_WINDOW,
		}
	}

	/// Network used when a request names none
	pub fn with_default_network(mut self, network: impl Into<String>) -> Self {
		self.default_network = normalize_string(&network.into());
		self
	}

	/// Blocks fetched per reverse window
	pub fn with_reverse_window(mut self, reverse_window: u64) -> Self {
		self.reverse_window = reverse_window;
		self
	}

	pub fn default_network(&self) -> &str {
		&self.default_network
	}

	pub fn networks(&self) -> &NetworkService<N> {
		&self.networks
	}

	/// Validates raw query-string parameters
	pub fn validate(
		&self,
		params: RawTransactionParams,
	) -> Result<TransactionQuery, TransactionServiceError> {
		params
			.validate(&self.default_network)
			.map_err(|errors| TransactionServiceError::validation_error(errors, None))
	}

	/// Finds a network by slug or chain id
	pub fn resolve_network(&self, network: &str) -> Result<NetworkConfig, TransactionServiceError> {
		self.networks.resolve(network).ok_or_else(|| {
			TransactionServiceError::unknown_network(
				format!("Network '{}' is not configured", network),
				None,
				Some(HashMap::from([("network".to_string(), network.to_string())])),
			)
		})
	}

	/// Returns the wallet's transactions, newest first.
	///
	/// With a `limit` the stream is only consumed until one record past the page
	/// is known, so `next_cursor` can be set without reading the whole history.
	#[instrument(skip_all, fields(wallet = %query.wallet, network = %query.network))]
	pub async fn get_wallet_transactions(
		&self,
		query: &TransactionQuery,
	) -> Result<TransactionPage, TransactionServiceError> {
		let network = self.resolve_network(&query.network)?;
		let client = self.client_pool.get_client(&network).await?;

		let upstream_query = build_wallet_query(query);
		let config = StreamConfig {
			reverse: true,
			reverse_window: self.reverse_window,
		};
		let mut stream = client.stream(upstream_query, config).await?;

		let cursor = query.page_cursor.unwrap_or(0);
		let wanted = query.limit.map(|limit| {
			usize::try_from(cursor)
				.unwrap_or(usize::MAX)
				.saturating_add(limit as usize)
				.saturating_add(1)
		});
		let result = collect_stream(stream.as_mut(), wanted).await;

		if let Err(e) = stream.close().await {
			tracing::warn!("Failed to close indexer stream: {}", e);
		}

		let records = result?;
		let page = paginate(records, cursor, query.limit);

		tracing::info!(
			returned = page.total,
			next_cursor = ?page.next_cursor,
			"fetched wallet transactions"
		);
		TRANSACTIONS_RETURNED.inc_by(page.total as u64);

		Ok(page)
	}

	/// Looks up one transaction by hash on `network` (or the default network).
	#[instrument(skip(self))]
	pub async fn get_transaction_by_hash(
		&self,
		hash: &str,
		network: Option<&str>,
	) -> Result<Transaction, TransactionServiceError> {
		let hash = hash.trim();
		if !is_transaction_hash(hash) {
			let mut errors = ValidationErrors::default();
			errors.add_field("hash", "Invalid transaction hash format");
			return Err(TransactionServiceError::validation_error(errors, None));
		}

		let network = self.resolve_network(network.unwrap_or(&self.default_network))?;
		let client = self.client_pool.get_client(&network).await?;

		let mut stream = client
			.stream(build_hash_query(hash), StreamConfig::default())
			.await?;
		let result = collect_stream(stream.as_mut(), Some(1)).await;

		if let Err(e) = stream.close().await {
			tracing::warn!("Failed to close indexer stream: {}", e);
		}

		let transaction = result?.into_iter().next().ok_or_else(|| {
			TransactionServiceError::not_found(
				format!("Transaction {} not found", hash),
				None,
				Some(HashMap::from([("network".to_string(), network.slug.clone())])),
			)
		})?;

		TRANSACTIONS_RETURNED.inc();
		Ok(transaction)
	}
}
