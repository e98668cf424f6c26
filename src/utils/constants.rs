//! Process-wide defaults.

/// Port the HTTP API listens on when `PORT` is unset
pub const DEFAULT_PORT: u16 = 3001;

/// Bind host when `HOST` is unset
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Network slug used when a request does not name one
pub const DEFAULT_NETWORK: &str = "ethereum";

/// Directory scanned for network overrides
pub const DEFAULT_NETWORKS_PATH: &str = "config/networks";

/// First block scanned when a request has no `fromBlock`
pub const DEFAULT_FROM_BLOCK: u64 = 1;

/// Size of the block window walked per step in reverse streams
pub const DEFAULT_REVERSE_WINDOW: u64 = 1_000_000;

/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: u16 = 100;
