use crate::properties::strategies::{batches_strategy, wallet_strategy};

use async_trait::async_trait;
use proptest::{option, prelude::*, test_runner::Config};
use std::{collections::VecDeque, str::FromStr, sync::Arc};
use wallet_history::{
	models::{NetworkConfig, Query, QueryResponse, Transaction, TransactionQuery},
	repositories::{NetworkRepository, NetworkService},
	services::{
		blockchain::{
			BlockChainError, ClientPoolTrait, IndexerClient, StreamConfig, TransactionStream,
		},
		transactions::{build_wallet_query, TransactionService},
	},
	utils::tests::builders::network::NetworkBuilder,
};

struct ReplayStream {
	batches: VecDeque<QueryResponse>,
}

#[async_trait]
impl TransactionStream for ReplayStream {
	async fn recv(&mut self) -> Result<Option<QueryResponse>, BlockChainError> {
		Ok(self.batches.pop_front())
	}

	async fn close(&mut self) -> Result<(), BlockChainError> {
		self.batches.clear();
		Ok(())
	}
}

/// Replays the same batches for every stream it opens
struct ReplayClient {
	batches: Vec<QueryResponse>,
}

#[async_trait]
impl IndexerClient for ReplayClient {
	async fn get_height(&self) -> Result<u64, BlockChainError> {
		Ok(0)
	}

	async fn query(&self, _query: &Query) -> Result<QueryResponse, BlockChainError> {
		Ok(self.batches.first().cloned().unwrap_or_default())
	}

	async fn stream(
		&self,
		_query: Query,
		_config: StreamConfig,
	) -> Result<Box<dyn TransactionStream>, BlockChainError> {
		Ok(Box::new(ReplayStream {
			batches: self.batches.clone().into(),
		}))
	}
}

struct ReplayPool {
	client: Arc<dyn IndexerClient>,
}

#[async_trait]
impl ClientPoolTrait for ReplayPool {
	async fn get_client(
		&self,
		_network: &NetworkConfig,
	) -> Result<Arc<dyn IndexerClient>, BlockChainError> {
		Ok(self.client.clone())
	}
}

fn service_for(batches: Vec<QueryResponse>) -> TransactionService<NetworkRepository, ReplayPool> {
	let network = NetworkBuilder::new().slug("ethereum").build();
	let networks = NetworkService::new_with_repository(NetworkRepository {
		networks: [(network.slug.clone(), network)].into_iter().collect(),
	})
	.unwrap();
	let pool = ReplayPool {
		client: Arc::new(ReplayClient { batches }),
	};
	TransactionService::new(Arc::new(networks), Arc::new(pool))
}

fn query_for(wallet: &str) -> TransactionQuery {
	TransactionQuery::new(
		alloy::primitives::Address::from_str(wallet).unwrap(),
		"ethereum",
	)
}

fn runtime() -> tokio::runtime::Runtime {
	tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()
		.unwrap()
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_upstream_range_is_exclusive_of_requested_end(
		wallet in wallet_strategy(),
		from_block in option::of(0u64..1_000_000),
		span in option::of(0u64..1_000_000),
	) {
		let to_block = span.map(|span| from_block.unwrap_or(1) + span);
		let query = TransactionQuery {
			from_block,
			to_block,
			..query_for(&wallet)
		};

		let upstream = build_wallet_query(&query);

		prop_assert_eq!(upstream.from_block, from_block.unwrap_or(1));
		prop_assert_eq!(upstream.to_block, to_block.map(|to| to + 1));
		prop_assert_eq!(upstream.transactions.len(), 2);
		prop_assert_eq!(&upstream.transactions[0].from, &vec![wallet.to_lowercase()]);
		prop_assert_eq!(&upstream.transactions[1].to, &vec![wallet.to_lowercase()]);
	}

	#[test]
	fn test_full_history_is_newest_first_with_batch_local_timestamps(
		wallet in wallet_strategy(),
		batches in batches_strategy(),
	) {
		let expected: usize = batches.iter().map(|batch| batch.data.transactions.len()).sum();
		let service = service_for(batches);

		let page = runtime()
			.block_on(service.get_wallet_transactions(&query_for(&wallet)))
			.unwrap();

		prop_assert_eq!(page.total, expected);
		prop_assert_eq!(page.next_cursor, None);
		prop_assert!(page
			.transactions
			.windows(2)
			.all(|pair| pair[0].block_number > pair[1].block_number));
		for tx in &page.transactions {
			let expected_timestamp =
				(tx.block_number % 2 == 0).then_some(1_600_000_000 + tx.block_number);
			prop_assert_eq!(tx.timestamp, expected_timestamp);
		}
	}

	#[test]
	fn test_walking_pages_visits_every_record_once(
		wallet in wallet_strategy(),
		batches in batches_strategy(),
		limit in 1u16..=10,
	) {
		let service = service_for(batches);
		let runtime = runtime();

		let full = runtime
			.block_on(service.get_wallet_transactions(&query_for(&wallet)))
			.unwrap()
			.transactions;

		let mut walked: Vec<Transaction> = Vec::new();
		let mut cursor = 0u64;
		loop {
			let query = TransactionQuery {
				limit: Some(limit),
				page_cursor: Some(cursor),
				..query_for(&wallet)
			};
			let page = runtime.block_on(service.get_wallet_transactions(&query)).unwrap();
			prop_assert!(page.total <= limit as usize);
			walked.extend(page.transactions);

			match page.next_cursor {
				Some(next) => {
					prop_assert_eq!(next, cursor + limit as u64);
					cursor = next;
				}
				None => break,
			}
		}

		prop_assert_eq!(walked, full);
	}
}
