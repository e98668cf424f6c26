use std::sync::Arc;

use wallet_history::services::blockchain::{ClientPool, ClientPoolTrait, IndexerClient};

use crate::integration::mocks::{create_height_mock, create_test_network, create_test_pool};

#[tokio::test]
async fn test_new_pool_is_empty() {
	let pool = ClientPool::default();
	assert_eq!(pool.get_client_count().await, 0);
}

#[tokio::test]
async fn test_get_client_creates_and_caches() {
	let mut server = mockito::Server::new_async().await;
	let mock = create_height_mock(&mut server, 42);
	let pool = create_test_pool();
	let network = create_test_network("ethereum", &server.url());

	let client1 = pool.get_client(&network).await.unwrap();
	assert_eq!(pool.get_client_count().await, 1);

	let client2 = pool.get_client(&network).await.unwrap();
	assert_eq!(pool.get_client_count().await, 1);
	assert!(Arc::ptr_eq(&client1, &client2));

	assert_eq!(client2.get_height().await.unwrap(), 42);
	mock.assert();
}

#[tokio::test]
async fn test_concurrent_requests_share_one_client() {
	let server = mockito::Server::new_async().await;
	let pool = Arc::new(create_test_pool());
	let network = create_test_network("ethereum", &server.url());

	let handles: Vec<_> = (0..8)
		.map(|_| {
			let pool = pool.clone();
			let network = network.clone();
			tokio::spawn(async move { pool.get_client(&network).await.unwrap() })
		})
		.collect();

	let clients: Vec<Arc<dyn IndexerClient>> = futures::future::join_all(handles)
		.await
		.into_iter()
		.map(|result| result.unwrap())
		.collect();

	assert_eq!(pool.get_client_count().await, 1);
	assert!(clients.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}
