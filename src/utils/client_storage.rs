use std::{collections::HashMap, future::Future, sync::Arc};
use tokio::sync::RwLock;

/// Thread-safe cache of clients keyed by network slug.
///
/// `T` may be unsized so trait objects can be stored directly.
pub struct ClientStorage<T: ?Sized> {
	pub clients: Arc<RwLock<HashMap<String, Arc<T>>>>,
}

impl<T: ?Sized> Default for ClientStorage<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: ?Sized> ClientStorage<T> {
	pub fn new() -> Self {
		Self {
			clients: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Returns the cached client for `key` or builds one with `create`.
	///
	/// The read lock serves the common case; creation re-checks under the write lock
	/// so concurrent callers never build two clients for the same key.
	pub async fn get_or_try_insert<E, F, Fut>(&self, key: &str, create: F) -> Result<Arc<T>, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<Arc<T>, E>>,
	{
		if let Some(client) = self.clients.read().await.get(key) {
			return Ok(client.clone());
		}

		let mut clients = self.clients.write().await;
		if let Some(client) = clients.get(key) {
			return Ok(client.clone());
		}

		let client = create().await?;
		clients.insert(key.to_string(), client.clone());
		Ok(client)
	}

	pub async fn len(&self) -> usize {
		self.clients.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.clients.read().await.is_empty()
	}
}
