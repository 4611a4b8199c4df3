//! Utility functions for formatting identifiers and hex strings.

pub mod formatting;

pub use formatting::{to_prefixed_hex, truncate_id, with_0x_prefix, without_0x_prefix};
