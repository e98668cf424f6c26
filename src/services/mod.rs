//! Core services implementing the business logic.
//!
//! - `api`: HTTP API over the transaction service
//! - `blockchain`: indexer client interfaces and implementations
//! - `dashboard`: client side data fetching and wallet session
//! - `transactions`: wallet transaction history

pub mod api;
pub mod blockchain;
pub mod dashboard;
pub mod transactions;
