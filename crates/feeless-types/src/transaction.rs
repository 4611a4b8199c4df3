//! Transaction types for the fee-delegated transaction protocol.
//!
//! A transaction is a body plus an optional signature field. When fees are
//! delegated the signature field holds the origin signature immediately
//! followed by the sponsor signature.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::BlockRef;

/// Bit in `reserved.features` that marks a transaction as accepting
/// delegated fee payment.
pub const DELEGATION_FEATURE: u32 = 1;

/// One atomic instruction within a transaction.
///
/// Serializes to the JSON shape the node expects for simulation:
/// `{ "to": "0x..." | null, "value": "0x...", "data": "0x..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
	/// Recipient, or `None` for contract creation.
	pub to: Option<Address>,
	/// Amount of the native token transferred with the clause.
	#[serde(default)]
	pub value: U256,
	/// Call data.
	#[serde(default)]
	pub data: Bytes,
}

impl Clause {
	/// Creates a call clause with zero value.
	pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
		Self {
			to: Some(to),
			value: U256::ZERO,
			data: data.into(),
		}
	}
}

/// Reserved field of a transaction body.
///
/// The entries after `features` are kept without trailing empty entries,
/// which is the only form the encoding admits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reserved {
	/// Feature bitfield. Bit 0 enables fee delegation.
	pub features: u32,
	unused: Vec<Bytes>,
}

impl Reserved {
	/// Builds a reserved field, dropping trailing empty entries from `unused`.
	pub fn new(features: u32, mut unused: Vec<Bytes>) -> Self {
		while unused.last().is_some_and(|entry| entry.is_empty()) {
			unused.pop();
		}
		Self { features, unused }
	}

	/// Reserved field with only the delegation feature enabled.
	pub fn delegated() -> Self {
		Self::new(DELEGATION_FEATURE, Vec::new())
	}

	/// Reserved entries after `features`, carried through untouched.
	pub fn unused(&self) -> &[Bytes] {
		&self.unused
	}
}

/// The unsigned content of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBody {
	/// Network identifier, the low byte of the genesis block id.
	pub chain_tag: u8,
	/// First 8 bytes of a recent block id.
	pub block_ref: BlockRef,
	/// Number of blocks after `block_ref` during which the transaction is valid.
	pub expiration: u32,
	/// Ordered clauses. Never empty for a valid body.
	pub clauses: Vec<Clause>,
	/// Coefficient applied to the base gas price.
	pub gas_price_coef: u8,
	/// Gas limit.
	pub gas: u64,
	/// Prerequisite transaction, if any.
	pub depends_on: Option<B256>,
	/// Uniquifier.
	pub nonce: u64,
	/// Reserved field holding the feature bits.
	pub reserved: Reserved,
}

impl TransactionBody {
	/// Returns true when the body accepts a sponsor signature.
	pub fn is_delegated(&self) -> bool {
		self.reserved.features & DELEGATION_FEATURE == DELEGATION_FEATURE
	}
}

/// A transaction body with its signature field, which may still be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	/// The body that both parties sign.
	pub body: TransactionBody,
	/// Origin signature followed by the sponsor signature, once available.
	pub signature: Option<Bytes>,
}

impl Transaction {
	/// Wraps a body that has not been signed yet.
	pub fn unsigned(body: TransactionBody) -> Self {
		Self {
			body,
			signature: None,
		}
	}

	/// Attaches the signature field, consuming the unsigned transaction.
	pub fn with_signature(self, signature: impl Into<Bytes>) -> Self {
		Self {
			body: self.body,
			signature: Some(signature.into()),
		}
	}

	/// Returns true once the signature field is populated.
	pub fn is_signed(&self) -> bool {
		self.signature.is_some()
	}
}

/// Identifier the network assigns to a submitted transaction.
///
/// Held exactly as the node returned it; no parsing or case normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TransactionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clause_json_shape() {
		let clause = Clause::call(Address::repeat_byte(0x11), vec![0xd0u8, 0x9d, 0xe0, 0x8a]);
		let json = serde_json::to_value(&clause).unwrap();

		assert_eq!(json["to"], "0x1111111111111111111111111111111111111111");
		assert_eq!(json["value"], "0x0");
		assert_eq!(json["data"], "0xd09de08a");
	}

	#[test]
	fn test_clause_contract_creation_serializes_null_to() {
		let clause = Clause {
			to: None,
			value: U256::from(5),
			data: Bytes::new(),
		};
		let json = serde_json::to_value(&clause).unwrap();
		assert!(json["to"].is_null());

		let back: Clause = serde_json::from_value(json).unwrap();
		assert_eq!(back, clause);
	}

	#[test]
	fn test_delegation_flag() {
		let mut body = TransactionBody {
			chain_tag: 0x27,
			block_ref: BlockRef::default(),
			expiration: 32,
			clauses: vec![Clause::call(Address::ZERO, Bytes::new())],
			gas_price_coef: 0,
			gas: 21000,
			depends_on: None,
			nonce: 1,
			reserved: Reserved::default(),
		};
		assert!(!body.is_delegated());

		body.reserved = Reserved::delegated();
		assert!(body.is_delegated());

		body.reserved.features = 0b110;
		assert!(!body.is_delegated());
	}

	#[test]
	fn test_reserved_drops_trailing_empty_entries() {
		let reserved = Reserved::new(DELEGATION_FEATURE, vec![Bytes::new()]);
		assert_eq!(reserved, Reserved::delegated());
		assert!(reserved.unused().is_empty());

		let reserved = Reserved::new(
			0,
			vec![Bytes::new(), Bytes::from(vec![0x01u8]), Bytes::new()],
		);
		assert_eq!(reserved.unused().len(), 2);
		assert!(reserved.unused()[0].is_empty());
	}

	#[test]
	fn test_transaction_id_is_kept_verbatim() {
		let id: TransactionId = serde_json::from_str("\"0x4D5A2D0cbc\"").unwrap();
		assert_eq!(id.as_str(), "0x4D5A2D0cbc");
		assert_eq!(id.to_string(), "0x4D5A2D0cbc");
		assert_eq!(serde_json::to_string(&id).unwrap(), "\"0x4D5A2D0cbc\"");
	}

	#[test]
	fn test_with_signature_sets_field() {
		let body = TransactionBody {
			chain_tag: 1,
			block_ref: BlockRef::default(),
			expiration: 1,
			clauses: vec![Clause::call(Address::ZERO, Bytes::new())],
			gas_price_coef: 0,
			gas: 1,
			depends_on: None,
			nonce: 0,
			reserved: Reserved::delegated(),
		};
		let tx = Transaction::unsigned(body);
		assert!(!tx.is_signed());

		let tx = tx.with_signature(vec![7u8; 130]);
		assert!(tx.is_signed());
		assert_eq!(tx.signature.unwrap().len(), 130);
	}
}
