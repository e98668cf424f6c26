//! Parsing utilities
//!
//! Byte sizes for CLI flags and the numeric quantities returned by the indexer.

use byte_unit::Byte;
use std::str::FromStr;

/// Parses a string argument into a `u64` value representing a file size.
///
/// Accepts human-readable formats like "1GB", "500MB", "1024KB", etc.
/// Returns an error if the format is invalid.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	match Byte::from_str(s) {
		Ok(byte) => Ok(byte.as_u64()),
		Err(e) => Err(format!("Invalid size format: '{}'. Error: {}", s, e)),
	}
}

/// Trims and lowercases, used for slug and address comparisons.
pub fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}

/// Parses an indexer quantity, either `0x`-prefixed hex or plain decimal.
pub fn parse_quantity(s: &str) -> Result<u64, String> {
	let trimmed = s.trim();
	match trimmed
		.strip_prefix("0x")
		.or_else(|| trimmed.strip_prefix("0X"))
	{
		Some("") => Err(format!("Invalid quantity: '{}'", s)),
		Some(hex) => u64::from_str_radix(hex, 16)
			.map_err(|e| format!("Invalid hex quantity: '{}'. Error: {}", s, e)),
		None => trimmed
			.parse::<u64>()
			.map_err(|e| format!("Invalid quantity: '{}'. Error: {}", s, e)),
	}
}
