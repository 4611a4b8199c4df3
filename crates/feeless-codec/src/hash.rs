//! Signing hash computation.
//!
//! Origin and sponsor sign the same 32-byte digest of the unsigned encoding.

use crate::encode_unsigned;
use alloy_primitives::{keccak256, B256};
use blake2::{digest::consts::U32, Blake2b, Digest};
use feeless_types::TransactionBody;
use serde::{Deserialize, Serialize};

type Blake2b256 = Blake2b<U32>;

/// Digest applied to the unsigned encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningHashAlgorithm {
	/// Keccak-256.
	#[default]
	Keccak256,
	/// BLAKE2b with a 256-bit output, as recomputed by thor validators.
	Blake2b256,
}

impl SigningHashAlgorithm {
	/// Hashes `data` with this algorithm.
	pub fn digest(&self, data: &[u8]) -> B256 {
		match self {
			Self::Keccak256 => keccak256(data),
			Self::Blake2b256 => B256::from_slice(Blake2b256::digest(data).as_slice()),
		}
	}
}

/// Keccak-256 signing hash of the unsigned body.
pub fn signing_hash(body: &TransactionBody) -> B256 {
	signing_hash_with(body, SigningHashAlgorithm::Keccak256)
}

/// Signing hash of the unsigned body under `algorithm`.
pub fn signing_hash_with(body: &TransactionBody, algorithm: SigningHashAlgorithm) -> B256 {
	algorithm.digest(&encode_unsigned(body))
}
