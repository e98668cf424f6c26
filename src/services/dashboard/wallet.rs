//! Wallet connection session.
//!
//! A [`WalletSession`] owns the provider handle, the provider event
//! subscription and the [`FetchCoordinator`] that keeps the connected
//! account's history loaded. It is created explicitly, started with
//! [`WalletSession::init`] and stopped with [`WalletSession::teardown`].

use async_trait::async_trait;
use std::sync::{Arc, Weak};
use thiserror::Error as ThisError;
use tokio::{
	sync::{mpsc, Mutex, RwLock},
	task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
	models::{default_chains, find_chain, ChainInfo},
	services::dashboard::{FetchCoordinator, FetchTarget, FetchTrigger, TransactionFetcher},
	utils::constants::DEFAULT_NETWORK,
};

/// Provider error code for a chain the wallet does not know yet
pub const CHAIN_NOT_ADDED_CODE: i64 = 4902;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
	#[error("Wallet is not connected")]
	NotConnected,

	#[error("Wallet returned no accounts")]
	NoAccounts,

	#[error("Account {0} is not available in the wallet")]
	AccountNotFound(String),

	#[error("Chain {0} is not supported")]
	UnknownChain(String),

	/// Error reported by the wallet itself
	#[error("Wallet error {code}: {message}")]
	Provider { code: i64, message: String },
}

impl WalletError {
	pub fn provider(code: i64, message: impl Into<String>) -> Self {
		Self::Provider {
			code,
			message: message.into(),
		}
	}

	pub fn code(&self) -> Option<i64> {
		match self {
			Self::Provider { code, .. } => Some(*code),
			_ => None,
		}
	}
}

/// Notification pushed by a wallet provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
	AccountsChanged(Vec<String>),
	ChainChanged(String),
	Connect { chain_id: String },
	Disconnect,
}

pub type WalletListener = Box<dyn Fn(WalletEvent) + Send + Sync>;

/// Browser or SDK wallet the session talks to
#[async_trait]
pub trait WalletProvider: Send + Sync {
	/// Prompts the user to connect and returns the granted accounts
	async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

	/// Accounts already granted, without prompting
	async fn accounts(&self) -> Result<Vec<String>, WalletError>;

	/// Hex id of the active chain
	async fn chain_id(&self) -> Result<String, WalletError>;

	async fn switch_chain(&self, chain_id: &str) -> Result<(), WalletError>;

	async fn add_chain(&self, chain: &ChainInfo) -> Result<(), WalletError>;

	async fn disconnect(&self) -> Result<(), WalletError>;

	/// Registers `listener` and returns an id for [`WalletProvider::unsubscribe`]
	fn subscribe(&self, listener: WalletListener) -> u64;

	fn unsubscribe(&self, id: u64);
}

/// Registration of a listener with a provider; released on
/// [`WalletSubscription::unsubscribe`] or when dropped
pub struct WalletSubscription {
	provider: Arc<dyn WalletProvider>,
	id: Option<u64>,
}

impl WalletSubscription {
	pub fn new(provider: Arc<dyn WalletProvider>, listener: WalletListener) -> Self {
		let id = provider.subscribe(listener);
		Self {
			provider,
			id: Some(id),
		}
	}

	pub fn id(&self) -> Option<u64> {
		self.id
	}

	pub fn unsubscribe(mut self) {
		self.release();
	}

	fn release(&mut self) {
		if let Some(id) = self.id.take() {
			self.provider.unsubscribe(id);
		}
	}
}

impl Drop for WalletSubscription {
	fn drop(&mut self) {
		self.release();
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletState {
	pub connected: bool,
	pub accounts: Vec<String>,
	pub current_account: Option<String>,
	/// Hex chain id reported by the wallet
	pub current_chain: Option<String>,
}

struct SessionInner<F> {
	provider: Arc<dyn WalletProvider>,
	coordinator: FetchCoordinator<F>,
	chains: Vec<ChainInfo>,
	state: RwLock<WalletState>,
	subscription: Mutex<Option<WalletSubscription>>,
	events: Mutex<Option<JoinHandle<()>>>,
}

/// Connected wallet plus the transaction loading that follows it
pub struct WalletSession<F> {
	inner: Arc<SessionInner<F>>,
}

impl<F> Clone for WalletSession<F> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<F: TransactionFetcher + 'static> WalletSession<F> {
	/// Creates a session offering [`default_chains`]
	pub fn new(provider: Arc<dyn WalletProvider>, fetcher: Arc<F>) -> Self {
		Self::with_chains(provider, fetcher, default_chains())
	}

	pub fn with_chains(
		provider: Arc<dyn WalletProvider>,
		fetcher: Arc<F>,
		chains: Vec<ChainInfo>,
	) -> Self {
		Self {
			inner: Arc::new(SessionInner {
				provider,
				coordinator: FetchCoordinator::new(fetcher),
				chains,
				state: RwLock::new(WalletState::default()),
				subscription: Mutex::new(None),
				events: Mutex::new(None),
			}),
		}
	}

	pub fn coordinator(&self) -> &FetchCoordinator<F> {
		&self.inner.coordinator
	}

	pub fn chains(&self) -> &[ChainInfo] {
		&self.inner.chains
	}

	pub async fn state(&self) -> WalletState {
		self.inner.state.read().await.clone()
	}

	/// Subscribes to provider events and restores an existing connection.
	///
	/// Calling it again on an initialized session only restores.
	pub async fn init(&self) -> Result<bool, WalletError> {
		let mut subscription = self.inner.subscription.lock().await;
		if subscription.is_none() {
			let (tx, mut rx) = mpsc::unbounded_channel();
			let listener: WalletListener = Box::new(move |event| {
				let _ = tx.send(event);
			});
			*subscription = Some(WalletSubscription::new(
				self.inner.provider.clone(),
				listener,
			));

			let session: Weak<SessionInner<F>> = Arc::downgrade(&self.inner);
			let events = tokio::spawn(async move {
				while let Some(event) = rx.recv().await {
					let Some(inner) = session.upgrade() else {
						break;
					};
					WalletSession { inner }.handle_event(event).await;
				}
			});
			*self.inner.events.lock().await = Some(events);
		}
		drop(subscription);

		self.restore().await
	}

	/// Picks up accounts the wallet already granted. Returns whether a
	/// connection was found.
	pub async fn restore(&self) -> Result<bool, WalletError> {
		let accounts = self.inner.provider.accounts().await?;
		if accounts.is_empty() {
			debug!("No existing wallet connection");
			return Ok(false);
		}

		let chain_id = self.inner.provider.chain_id().await?;
		self.apply_connection(accounts, chain_id).await;
		self.inner.coordinator.trigger(FetchTrigger::Connected).await;
		Ok(true)
	}

	/// Asks the wallet for accounts and starts loading the first one's history
	pub async fn connect(&self) -> Result<WalletState, WalletError> {
		let accounts = self.inner.provider.request_accounts().await?;
		if accounts.is_empty() {
			return Err(WalletError::NoAccounts);
		}

		let chain_id = self.inner.provider.chain_id().await?;
		self.apply_connection(accounts, chain_id).await;
		self.inner.coordinator.trigger(FetchTrigger::Connected).await;

		let state = self.state().await;
		info!(
			"Wallet connected: {:?} on {:?}",
			state.current_account, state.current_chain
		);
		Ok(state)
	}

	/// Switches the wallet to `chain_id`, adding the chain first when the
	/// wallet does not know it
	pub async fn switch_chain(&self, chain_id: &str) -> Result<(), WalletError> {
		let chain = find_chain(&self.inner.chains, chain_id)
			.cloned()
			.ok_or_else(|| WalletError::UnknownChain(chain_id.to_string()))?;
		if !self.inner.state.read().await.connected {
			return Err(WalletError::NotConnected);
		}

		match self.inner.provider.switch_chain(&chain.chain_id).await {
			Ok(()) => {}
			Err(e) if e.code() == Some(CHAIN_NOT_ADDED_CODE) => {
				info!("Adding {} to the wallet", chain.chain_name);
				self.add_chain(&chain).await?;
				self.inner.provider.switch_chain(&chain.chain_id).await?;
			}
			Err(e) => return Err(e),
		}

		self.inner.state.write().await.current_chain = Some(chain.chain_id.clone());
		self.retarget().await;
		self.inner
			.coordinator
			.trigger(FetchTrigger::NetworkSwitched)
			.await;
		Ok(())
	}

	pub async fn add_chain(&self, chain: &ChainInfo) -> Result<(), WalletError> {
		self.inner.provider.add_chain(chain).await
	}

	/// Makes `account` current. The address must be one the wallet granted;
	/// the comparison ignores case.
	pub async fn switch_account(&self, account: &str) -> Result<(), WalletError> {
		{
			let mut state = self.inner.state.write().await;
			if !state.connected {
				return Err(WalletError::NotConnected);
			}
			let found = state
				.accounts
				.iter()
				.find(|candidate| candidate.eq_ignore_ascii_case(account))
				.cloned()
				.ok_or_else(|| WalletError::AccountNotFound(account.to_string()))?;
			state.current_account = Some(found);
		}

		self.retarget().await;
		self.inner
			.coordinator
			.trigger(FetchTrigger::AccountSwitched)
			.await;
		Ok(())
	}

	/// Reloads the current account's history now
	pub async fn refresh(&self) -> Result<(), WalletError> {
		if !self.inner.state.read().await.connected {
			return Err(WalletError::NotConnected);
		}
		self.inner.coordinator.force().await;
		Ok(())
	}

	/// Disconnects the wallet. Local state is cleared even when the provider
	/// reports an error.
	pub async fn disconnect(&self) -> Result<(), WalletError> {
		let result = self.inner.provider.disconnect().await;
		self.reset().await;
		result
	}

	/// Applies a provider event
	pub async fn handle_event(&self, event: WalletEvent) {
		debug!("Wallet event: {:?}", event);
		match event {
			WalletEvent::AccountsChanged(accounts) => {
				if accounts.is_empty() {
					info!("Wallet revoked all accounts");
					self.reset().await;
					return;
				}
				{
					let mut state = self.inner.state.write().await;
					state.current_account = accounts.first().cloned();
					state.accounts = accounts;
				}
				self.retarget().await;
				self.inner
					.coordinator
					.trigger(FetchTrigger::AccountChanged)
					.await;
			}
			WalletEvent::ChainChanged(chain_id) => {
				self.inner.state.write().await.current_chain = Some(chain_id.clone());
				if find_chain(&self.inner.chains, &chain_id).is_none() {
					warn!("Wallet switched to unsupported chain {}", chain_id);
					return;
				}
				self.retarget().await;
				self.inner
					.coordinator
					.trigger(FetchTrigger::ChainChanged)
					.await;
			}
			WalletEvent::Connect { chain_id } => {
				self.inner.state.write().await.current_chain = Some(chain_id);
			}
			WalletEvent::Disconnect => {
				info!("Wallet disconnected");
				self.reset().await;
			}
		}
	}

	/// Drops the provider subscription and stops all loading
	pub async fn teardown(&self) {
		if let Some(subscription) = self.inner.subscription.lock().await.take() {
			subscription.unsubscribe();
		}
		if let Some(events) = self.inner.events.lock().await.take() {
			events.abort();
		}
		self.inner.coordinator.cancel().await;
	}

	async fn apply_connection(&self, accounts: Vec<String>, chain_id: String) {
		{
			let mut state = self.inner.state.write().await;
			state.connected = true;
			state.current_account = accounts.first().cloned();
			state.accounts = accounts;
			state.current_chain = Some(chain_id);
		}
		self.retarget().await;
	}

	async fn reset(&self) {
		*self.inner.state.write().await = WalletState::default();
		self.inner.coordinator.cancel().await;
		self.inner.coordinator.set_target(None).await;
	}

	/// Network slug for a chain id; unknown chains fall back to the default network
	fn network_for(&self, chain_id: Option<&str>) -> String {
		chain_id
			.and_then(|id| find_chain(&self.inner.chains, id))
			.map(|chain| chain.network.clone())
			.filter(|network| !network.is_empty())
			.unwrap_or_else(|| DEFAULT_NETWORK.to_string())
	}

	async fn retarget(&self) {
		let target = {
			let state = self.inner.state.read().await;
			state.current_account.as_ref().map(|account| {
				FetchTarget::new(account.clone(), self.network_for(state.current_chain.as_deref()))
			})
		};
		self.inner.coordinator.set_target(target).await;
	}
}
