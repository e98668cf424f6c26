//! Test helper utilities
//!
//! - `builders`: builders for networks and indexer batches

pub mod builders {
	pub mod network;
	pub mod transaction;
}

pub use builders::*;
