use mockito::Matcher;
use serde_json::json;

use wallet_history::{
	models::{FieldSelection, JoinMode, Query, TransactionSelection},
	services::blockchain::{BlockChainError, HyperSyncClient, IndexerClient, StreamConfig},
	utils::{JitterSetting, RetryConfig},
};

use crate::integration::mocks::{
	create_batch_body, create_height_mock, create_query_mock, create_test_network, WALLET_LOWER,
};

fn retry_config(max_retries: u32) -> RetryConfig {
	RetryConfig {
		max_retries,
		initial_backoff: std::time::Duration::from_millis(1),
		max_backoff: std::time::Duration::from_millis(5),
		jitter: JitterSetting::None,
		..RetryConfig::default()
	}
}

fn wallet_query(from_block: u64, to_block: Option<u64>) -> Query {
	Query {
		from_block,
		to_block,
		transactions: vec![
			TransactionSelection::from_address(WALLET_LOWER),
			TransactionSelection::to_address(WALLET_LOWER),
		],
		field_selection: FieldSelection::transaction_history(),
		join_mode: JoinMode::JoinAll,
		max_num_transactions: None,
	}
}

#[tokio::test]
async fn test_get_height_sends_bearer_token() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", "/height")
		.match_header("authorization", "Bearer secret-token")
		.with_status(200)
		.with_body(r#"{"height": 21000000}"#)
		.create();

	let network = create_test_network("ethereum", &server.url());
	let client = HyperSyncClient::new(
		&network,
		&retry_config(0),
		Some("secret-token".to_string()),
	)
	.unwrap();

	assert_eq!(client.get_height().await.unwrap(), 21_000_000);
	mock.assert();
}

#[tokio::test]
async fn test_query_posts_selection() {
	let mut server = mockito::Server::new_async().await;
	let mock = create_query_mock(
		&mut server,
		json!({"from_block": 5, "to_block": 10, "join_mode": "JoinAll"}),
		create_batch_body(&[(7, 1_700_000_007)], 10),
	);

	let network = create_test_network("ethereum", &server.url());
	let client = HyperSyncClient::new(&network, &retry_config(0), None).unwrap();

	let response = client.query(&wallet_query(5, Some(10))).await.unwrap();

	assert_eq!(response.next_block, 10);
	assert_eq!(response.data.transactions.len(), 1);
	assert_eq!(response.data.blocks[0].timestamp, Some(1_700_000_007));
	mock.assert();
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/query")
		.with_status(400)
		.with_body("invalid query")
		.expect(1)
		.create();

	let network = create_test_network("ethereum", &server.url());
	let client = HyperSyncClient::new(&network, &retry_config(3), None).unwrap();

	let result = client.query(&wallet_query(0, None)).await;

	assert!(matches!(result, Err(BlockChainError::RequestError(_))));
	mock.assert();
}

#[tokio::test]
async fn test_server_errors_are_retried() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", "/height")
		.with_status(503)
		.expect(3)
		.create();

	let network = create_test_network("ethereum", &server.url());
	let client = HyperSyncClient::new(&network, &retry_config(2), None).unwrap();

	assert!(client.get_height().await.is_err());
	mock.assert();
}

#[tokio::test]
async fn test_unreachable_indexer_is_a_connection_error() {
	let network = create_test_network("ethereum", "http://127.0.0.1:9");
	let client = HyperSyncClient::new(&network, &retry_config(0), None).unwrap();

	let result = client.get_height().await;

	assert!(matches!(result, Err(BlockChainError::ConnectionError(_))));
}

#[tokio::test]
async fn test_reverse_stream_walks_windows_newest_first() {
	let mut server = mockito::Server::new_async().await;
	let height = create_height_mock(&mut server, 249);
	let upper = create_query_mock(
		&mut server,
		json!({"from_block": 150, "to_block": 250}),
		create_batch_body(&[(160, 1_700_000_160), (240, 1_700_000_240)], 250),
	);
	let middle = create_query_mock(
		&mut server,
		json!({"from_block": 50, "to_block": 150}),
		json!({"data": {"transactions": [], "blocks": []}, "next_block": 150}),
	);
	let lower = create_query_mock(
		&mut server,
		json!({"from_block": 1, "to_block": 50}),
		create_batch_body(&[(3, 1_700_000_003)], 50),
	);

	let network = create_test_network("ethereum", &server.url());
	let client = HyperSyncClient::new(&network, &retry_config(0), None).unwrap();
	let mut stream = client
		.stream(
			wallet_query(1, None),
			StreamConfig {
				reverse: true,
				reverse_window: 100,
			},
		)
		.await
		.unwrap();

	let mut blocks = Vec::new();
	while let Some(batch) = stream.recv().await.unwrap() {
		blocks.extend(
			batch
				.data
				.transactions
				.iter()
				.filter_map(|tx| tx.block_number),
		);
	}
	stream.close().await.unwrap();

	assert_eq!(blocks, vec![240, 160, 3]);
	assert!(stream.recv().await.unwrap().is_none());
	height.assert();
	upper.assert();
	middle.assert();
	lower.assert();
}

#[tokio::test]
async fn test_forward_stream_follows_next_block() {
	let mut server = mockito::Server::new_async().await;
	let first = server
		.mock("POST", "/query")
		.match_body(Matcher::PartialJson(json!({"from_block": 0})))
		.with_status(200)
		.with_body(create_batch_body(&[(5, 1_700_000_005)], 100).to_string())
		.create();
	let second = server
		.mock("POST", "/query")
		.match_body(Matcher::PartialJson(json!({"from_block": 100})))
		.with_status(200)
		.with_body(
			json!({
				"data": {"transactions": [], "blocks": []},
				"next_block": 150,
				"archive_height": 149
			})
			.to_string(),
		)
		.create();

	let network = create_test_network("ethereum", &server.url());
	let client = HyperSyncClient::new(&network, &retry_config(0), None).unwrap();
	let mut stream = client
		.stream(wallet_query(0, None), StreamConfig::default())
		.await
		.unwrap();

	let mut batches = 0;
	while stream.recv().await.unwrap().is_some() {
		batches += 1;
	}

	assert_eq!(batches, 2);
	first.assert();
	second.assert();
}
