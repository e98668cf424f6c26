//! Wallet transaction history service.
//!
//! This library reads the transactions sent or received by an EVM wallet from
//! the HyperSync indexer and serves them over HTTP. It also provides the
//! client side used by dashboards: an API client with retry and cancellation,
//! a debounced fetch coordinator and a wallet session.
//!
//! # Module Structure
//!
//! - `bootstrap`: Wires settings and services together
//! - `models`: Networks, transactions, queries and indexer wire types
//! - `repositories`: Network catalog storage and lookup
//! - `services`: Indexer clients, transaction ingestion, HTTP API and dashboard client
//! - `utils`: Logging, metrics, HTTP and parsing helpers

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
