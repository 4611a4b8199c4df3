//! Chain status types.
//!
//! The node reports blocks as JSON objects. Only a handful of fields matter
//! for building a transaction, so [`BlockSummary`] keeps those and ignores
//! the rest.

use alloy_primitives::{B256, B64};
use serde::{Deserialize, Serialize};

/// 8-byte reference to a recent block.
pub type BlockRef = B64;

/// Subset of a block as returned by `GET /blocks/{revision}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
	/// Block identifier.
	pub id: B256,
	/// Block height.
	#[serde(default)]
	pub number: u64,
	/// Gas limit of the block.
	#[serde(default)]
	pub gas_limit: u64,
	/// Block timestamp (Unix seconds).
	#[serde(default)]
	pub timestamp: u64,
}

/// Network state needed to anchor a new transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStatus {
	/// Low byte of the genesis block id.
	pub chain_tag: u8,
	/// First 8 bytes of the best block id.
	pub block_ref: BlockRef,
	/// Gas limit of the best block.
	pub gas_limit: u64,
}

impl ChainStatus {
	/// Derives the chain status from the best and genesis blocks.
	pub fn from_blocks(best: &BlockSummary, genesis: &BlockSummary) -> Self {
		Self {
			chain_tag: genesis.id[31],
			block_ref: BlockRef::from_slice(&best.id[..8]),
			gas_limit: best.gas_limit,
		}
	}
}
