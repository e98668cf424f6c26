use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use wallet_history::{
	repositories::NetworkRepository,
	services::{api::configure_routes, blockchain::ClientPool, transactions::TransactionService},
};

use crate::integration::mocks::{
	create_batch_body, create_height_mock, create_network_service, create_query_mock,
	create_test_network, create_test_pool, WALLET, WALLET_LOWER,
};

type Service = TransactionService<NetworkRepository, ClientPool>;

fn create_service(url: &str) -> Arc<Service> {
	let networks = create_network_service(vec![create_test_network("ethereum", url)]);
	Arc::new(TransactionService::new(
		Arc::new(networks),
		Arc::new(create_test_pool()),
	))
}

async fn get(service: Arc<Service>, uri: &str) -> (StatusCode, Value) {
	let app = test::init_service(
		App::new()
			.app_data(web::Data::from(service))
			.configure(configure_routes::<NetworkRepository, ClientPool>),
	)
	.await;

	let req = test::TestRequest::get().uri(uri).to_request();
	let resp = test::call_service(&app, req).await;
	let status = resp.status();
	let body = test::read_body(resp).await;
	let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
	(status, json)
}

#[actix_web::test]
async fn test_health() {
	let (status, body) = get(create_service("http://localhost:1"), "/").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "OK");
	assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[actix_web::test]
async fn test_wallet_history_newest_first() {
	let mut server = mockito::Server::new_async().await;
	let height = create_height_mock(&mut server, 100);
	let query = create_query_mock(
		&mut server,
		json!({
			"from_block": 1,
			"to_block": 101,
			"join_mode": "JoinAll",
			"transactions": [{"from": [WALLET_LOWER]}, {"to": [WALLET_LOWER]}]
		}),
		create_batch_body(&[(10, 1_700_000_010), (50, 1_700_000_050)], 101),
	);

	let (status, body) = get(
		create_service(&server.url()),
		&format!("/api/transactions?wallet={}&network=ethereum", WALLET),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], true);
	assert_eq!(body["network"], "ethereum");
	assert_eq!(body["wallet"], WALLET_LOWER);
	assert_eq!(body["total"], 2);
	assert!(body.get("nextCursor").is_none());

	let transactions = body["transactions"].as_array().unwrap();
	assert_eq!(transactions[0]["blockNumber"], 50);
	assert_eq!(transactions[0]["timestamp"], 1_700_000_050);
	assert_eq!(transactions[0]["value"], "1000000000000000000");
	assert_eq!(transactions[0]["status"], "success");
	assert_eq!(transactions[1]["blockNumber"], 10);

	height.assert();
	query.assert();
}

#[actix_web::test]
async fn test_wallet_path_with_pagination() {
	let mut server = mockito::Server::new_async().await;
	let _height = create_height_mock(&mut server, 100);
	let _query = create_query_mock(
		&mut server,
		json!({"from_block": 1}),
		create_batch_body(&[(10, 1_700_000_010), (20, 1_700_000_020), (30, 1_700_000_030)], 101),
	);

	let (status, body) = get(
		create_service(&server.url()),
		&format!("/api/transactions/{}?limit=1&pageCursor=1", WALLET),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["network"], "ethereum");
	assert_eq!(body["total"], 1);
	assert_eq!(body["transactions"][0]["blockNumber"], 20);
	assert_eq!(body["nextCursor"], 2);
}

#[actix_web::test]
async fn test_invalid_wallet_never_reaches_indexer() {
	let mut server = mockito::Server::new_async().await;
	let height = server.mock("GET", "/height").expect(0).create();
	let query = server.mock("POST", "/query").expect(0).create();

	let (status, body) = get(
		create_service(&server.url()),
		"/api/transactions?wallet=0x123",
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "ValidationError");
	assert_eq!(body["message"], "Invalid request");
	assert_eq!(
		body["details"]["fieldErrors"]["wallet"][0],
		"Invalid wallet address format"
	);
	height.assert();
	query.assert();
}

#[actix_web::test]
async fn test_inverted_block_range_is_rejected() {
	let mut server = mockito::Server::new_async().await;
	let query = server.mock("POST", "/query").expect(0).create();

	let (status, body) = get(
		create_service(&server.url()),
		&format!("/api/transactions?wallet={}&fromBlock=200&toBlock=100", WALLET),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(
		body["details"]["fieldErrors"]["toBlock"][0],
		"toBlock must be >= fromBlock"
	);
	query.assert();
}

#[actix_web::test]
async fn test_unknown_network_is_a_bad_request() {
	let (status, body) = get(
		create_service("http://localhost:1"),
		&format!("/api/transactions?wallet={}&network=atlantis", WALLET),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(
		body["details"]["fieldErrors"]["network"][0],
		"Network 'atlantis' is not configured"
	);
}

#[actix_web::test]
async fn test_indexer_failure_is_bad_gateway() {
	let mut server = mockito::Server::new_async().await;
	let _height = server
		.mock("GET", "/height")
		.with_status(400)
		.with_body("bad request")
		.create();

	let (status, body) = get(
		create_service(&server.url()),
		&format!("/api/transactions?wallet={}", WALLET),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(body["error"], "UpstreamError");
}

#[actix_web::test]
async fn test_transaction_by_hash() {
	let mut server = mockito::Server::new_async().await;
	let hash = format!("0x{:064x}", 42);
	let query = create_query_mock(
		&mut server,
		json!({"from_block": 0, "max_num_transactions": 1, "transactions": [{"hash": [hash]}]}),
		create_batch_body(&[(42, 1_700_000_042)], 43),
	);

	let (status, body) = get(
		create_service(&server.url()),
		&format!("/api/transactions/{}", hash),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], true);
	assert_eq!(body["transaction"]["hash"], hash);
	assert_eq!(body["transaction"]["timestamp"], 1_700_000_042);
	query.assert();
}

#[actix_web::test]
async fn test_missing_transaction_is_not_found() {
	let mut server = mockito::Server::new_async().await;
	let _query = create_query_mock(
		&mut server,
		json!({"from_block": 0}),
		json!({"data": {"transactions": [], "blocks": []}, "next_block": 100, "archive_height": 99}),
	);

	let (status, body) = get(
		create_service(&server.url()),
		&format!("/api/transactions/0x{}", "ab".repeat(32)),
	)
	.await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error"], "NotFound");
}

#[actix_web::test]
async fn test_networks_catalog() {
	let service = create_service("http://localhost:1");

	let (status, body) = get(service.clone(), "/api/networks").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["networks"][0]["slug"], "ethereum");

	let (status, body) = get(service.clone(), "/api/networks?tier=gold").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["networks"].as_array().unwrap().len(), 1);

	let (status, body) = get(service, "/api/networks?tier=platinum").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(body["details"]["fieldErrors"]["tier"].is_array());
}

#[actix_web::test]
async fn test_metrics_endpoint() {
	let service = create_service("http://localhost:1");
	let app = test::init_service(
		App::new()
			.app_data(web::Data::from(service))
			.configure(configure_routes::<NetworkRepository, ClientPool>),
	)
	.await;

	let req = test::TestRequest::get().uri("/metrics").to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::OK);

	let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
	assert!(body.contains("networks_configured"));
}
