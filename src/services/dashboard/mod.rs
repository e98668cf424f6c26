//! Client side of the transaction dashboard.
//!
//! - `client`: HTTP client for the API with timeout, retry and cancellation
//! - `coordinator`: debounced, single-flight fetching of the wallet's transactions
//! - `wallet`: wallet session owning the provider, its event subscription and
//!   the coordinator
//!
//! Wallet providers themselves are external; they are reached through the
//! [`WalletProvider`] trait.

mod client;
mod coordinator;
mod error;
mod retry;
mod wallet;

pub use client::{DashboardApiClient, TransactionFetcher};
pub use coordinator::{
	FetchCoordinator, FetchState, FetchStatus, FetchTarget, FetchTrigger, TriggerOutcome,
};
pub use error::{ApiError, FetchError};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use wallet::{
	WalletError, WalletEvent, WalletListener, WalletProvider, WalletSession, WalletState,
	WalletSubscription, CHAIN_NOT_ADDED_CODE,
};
