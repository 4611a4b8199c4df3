//! Hex string helpers.
//!
//! Every byte string crossing the HTTP boundary is `0x`-prefixed hex, so
//! these helpers show up in the node client, the sponsor client and in log
//! lines.

/// Shortens a hex identifier for log output: `0x1234abcd..`.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 10 {
		id.to_string()
	} else {
		format!("{}..", &id[..10])
	}
}

/// Adds a `0x` prefix unless one is already present.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.starts_with("0x") || hex_str.starts_with("0X") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Strips a leading `0x` or `0X` if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

/// Encodes bytes as lowercase `0x`-prefixed hex.
pub fn to_prefixed_hex(bytes: impl AsRef<[u8]>) -> String {
	with_0x_prefix(&hex::encode(bytes))
}
