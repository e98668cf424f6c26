//! Debounced, single-flight loading of a wallet's transactions.
//!
//! Wallet events arrive in bursts (an account change is usually followed by a
//! chain change), so passive triggers are debounced and dropped while a load
//! is running or a settled load is pending. Explicit user actions wait for the
//! wallet to settle and then replace whatever load is in flight. Each started load cancels its
//! predecessor's token and bumps a generation counter; completions carrying an
//! older generation are discarded.

use std::{sync::Arc, time::Duration};
use tokio::{
	sync::{watch, Mutex},
	task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
	models::Transaction,
	services::dashboard::{ApiError, FetchError, TransactionFetcher},
};

const DEBOUNCE: Duration = Duration::from_millis(500);
const CONNECT_SETTLE: Duration = Duration::from_millis(1000);
const SWITCH_SETTLE: Duration = Duration::from_millis(500);

/// Reason a load was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
	/// The wallet reported a different account
	AccountChanged,
	/// The wallet reported a different chain
	ChainChanged,
	ManualRefresh,
	/// A connection was made or restored
	Connected,
	/// The user picked another account
	AccountSwitched,
	/// The user picked another network
	NetworkSwitched,
}

enum Schedule {
	Debounce(Duration),
	Settle(Duration),
}

impl FetchTrigger {
	fn schedule(self) -> Schedule {
		match self {
			Self::AccountChanged | Self::ChainChanged | Self::ManualRefresh => {
				Schedule::Debounce(DEBOUNCE)
			}
			Self::Connected => Schedule::Settle(CONNECT_SETTLE),
			Self::AccountSwitched | Self::NetworkSwitched => Schedule::Settle(SWITCH_SETTLE),
		}
	}
}

/// What [`FetchCoordinator::trigger`] did with a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
	/// A debounced load is scheduled
	Debounced,
	/// A forced load starts once the wallet settles
	Settling,
	/// Ignored: no target, a load is already running or a settled load is pending
	Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
	#[default]
	Idle,
	Loading,
	Success,
	Error,
	Cancelled,
}

/// Wallet and network whose history is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
	pub wallet: String,
	pub network: String,
}

impl FetchTarget {
	pub fn new(wallet: impl Into<String>, network: impl Into<String>) -> Self {
		Self {
			wallet: wallet.into(),
			network: network.into(),
		}
	}
}

/// Snapshot published to subscribers after every transition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchState {
	pub status: FetchStatus,
	pub transactions: Vec<Transaction>,
	pub error: Option<ApiError>,
	pub wallet: Option<String>,
	pub network: Option<String>,
}

impl FetchState {
	fn for_target(target: Option<&FetchTarget>) -> Self {
		Self {
			wallet: target.map(|t| t.wallet.clone()),
			network: target.map(|t| t.network.clone()),
			..Self::default()
		}
	}
}

#[derive(Default)]
struct Control {
	target: Option<FetchTarget>,
	timer: Option<JoinHandle<()>>,
	/// The pending timer belongs to a settle trigger
	settling: bool,
	in_flight: Option<CancellationToken>,
	generation: u64,
}

impl Control {
	fn abort_timer(&mut self) {
		if let Some(timer) = self.timer.take() {
			timer.abort();
		}
		self.settling = false;
	}

	/// Cancels the running load and invalidates its completion
	fn cancel_in_flight(&mut self) -> bool {
		self.generation += 1;
		match self.in_flight.take() {
			Some(token) => {
				token.cancel();
				true
			}
			None => false,
		}
	}
}

struct Inner<F> {
	fetcher: Arc<F>,
	control: Mutex<Control>,
	state: watch::Sender<FetchState>,
}

/// Schedules transaction loads for one wallet session
pub struct FetchCoordinator<F> {
	inner: Arc<Inner<F>>,
}

impl<F> Clone for FetchCoordinator<F> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<F: TransactionFetcher + 'static> FetchCoordinator<F> {
	pub fn new(fetcher: Arc<F>) -> Self {
		let (state, _) = watch::channel(FetchState::default());
		Self {
			inner: Arc::new(Inner {
				fetcher,
				control: Mutex::new(Control::default()),
				state,
			}),
		}
	}

	pub fn state(&self) -> FetchState {
		self.inner.state.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<FetchState> {
		self.inner.state.subscribe()
	}

	pub async fn target(&self) -> Option<FetchTarget> {
		self.inner.control.lock().await.target.clone()
	}

	/// Points the coordinator at another wallet or network.
	///
	/// A different target cancels pending work and clears the published state.
	pub async fn set_target(&self, target: Option<FetchTarget>) {
		let mut control = self.inner.control.lock().await;
		if control.target == target {
			return;
		}

		control.abort_timer();
		control.cancel_in_flight();
		self.inner
			.state
			.send_replace(FetchState::for_target(target.as_ref()));
		control.target = target;
	}

	/// Schedules a load according to the trigger's kind
	pub async fn trigger(&self, trigger: FetchTrigger) -> TriggerOutcome {
		let mut control = self.inner.control.lock().await;
		if control.target.is_none() {
			debug!("Ignoring {:?}: no wallet selected", trigger);
			return TriggerOutcome::Dropped;
		}

		let (delay, forced) = match trigger.schedule() {
			Schedule::Debounce(delay) => {
				if control.in_flight.is_some() {
					debug!("Ignoring {:?}: a load is already running", trigger);
					return TriggerOutcome::Dropped;
				}
				if control.settling {
					debug!("Ignoring {:?}: a settled load is pending", trigger);
					return TriggerOutcome::Dropped;
				}
				(delay, false)
			}
			Schedule::Settle(delay) => (delay, true),
		};

		control.abort_timer();
		control.settling = forced;
		let this = self.clone();
		control.timer = Some(tokio::spawn(async move {
			tokio::time::sleep(delay).await;
			let mut control = this.inner.control.lock().await;
			control.timer = None;
			control.settling = false;
			if !forced && control.in_flight.is_some() {
				debug!("Skipping debounced load: a load is already running");
				return;
			}
			this.start(&mut control);
		}));

		if forced {
			TriggerOutcome::Settling
		} else {
			TriggerOutcome::Debounced
		}
	}

	/// Starts a load now, replacing any pending or running one
	pub async fn force(&self) {
		let mut control = self.inner.control.lock().await;
		control.abort_timer();
		self.start(&mut control);
	}

	/// Stops pending and running loads
	pub async fn cancel(&self) {
		let mut control = self.inner.control.lock().await;
		control.abort_timer();
		if control.cancel_in_flight() {
			info!("Cancelled transaction load");
			self.inner.state.send_modify(|state| {
				state.status = FetchStatus::Cancelled;
			});
		}
	}

	fn start(&self, control: &mut Control) {
		let Some(target) = control.target.clone() else {
			return;
		};

		control.cancel_in_flight();
		let generation = control.generation;
		let token = CancellationToken::new();
		control.in_flight = Some(token.clone());

		self.inner.state.send_modify(|state| {
			state.status = FetchStatus::Loading;
			state.error = None;
			state.wallet = Some(target.wallet.clone());
			state.network = Some(target.network.clone());
		});

		debug!(
			"Loading transactions for {} on {} (generation {})",
			target.wallet, target.network, generation
		);

		let this = self.clone();
		tokio::spawn(async move {
			let result = this
				.inner
				.fetcher
				.fetch_transactions(&target.wallet, &target.network, &token)
				.await;
			this.complete(generation, result).await;
		});
	}

	async fn complete(&self, generation: u64, result: Result<Vec<Transaction>, FetchError>) {
		let mut control = self.inner.control.lock().await;
		if control.generation != generation {
			debug!("Discarding stale load (generation {})", generation);
			return;
		}
		control.in_flight = None;

		self.inner.state.send_modify(|state| match result {
			Ok(transactions) => {
				state.status = FetchStatus::Success;
				state.transactions = transactions;
			}
			Err(FetchError::Cancelled) => {
				state.status = FetchStatus::Cancelled;
			}
			Err(FetchError::Failed(error)) => {
				warn!("Failed to load transactions: {}", error);
				state.status = FetchStatus::Error;
				state.error = Some(error);
			}
		});
	}
}
