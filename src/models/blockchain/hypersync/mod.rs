//! HyperSync JSON API types.
//!
//! A [`Query`] is posted to `{url}/query`; the indexer answers with a
//! [`QueryResponse`] holding one batch of data and the block to resume from.

mod query;
mod response;

pub use query::{
	BlockField, FieldSelection, JoinMode, Query, TransactionField, TransactionSelection,
};
pub use response::{HyperSyncBlock, HyperSyncTransaction, QueryResponse, ResponseData};
