//! Indexer client implementations.

mod hypersync {
	pub mod client;
	pub mod stream;
}

pub use hypersync::{client::HyperSyncClient, stream::HyperSyncStream};
