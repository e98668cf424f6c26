//! Wire types of external blockchain services.
//!
//! Only the HyperSync indexer is spoken to; its JSON query and response shapes
//! live in [`hypersync`].

pub mod hypersync;
