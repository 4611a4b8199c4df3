//! Transaction codec for the fee-delegated transaction protocol.
//!
//! This module produces the canonical binary form of a transaction, the
//! digest both signers sign, and the combined signature field. The encoding
//! is an RLP list with a fixed field order:
//!
//! ```text
//! [chain_tag, block_ref, expiration, [[to, value, data], ...],
//!  gas_price_coef, gas, depends_on, nonce, [features, ...], signature?]
//! ```
//!
//! The signed form differs from the unsigned form only by the trailing
//! signature field.

use alloy_primitives::{Address, Bytes, B256, U256};
use feeless_types::{BlockRef, Clause, Reserved, Transaction, TransactionBody};
use thiserror::Error;

pub mod hash;
mod rlp;
pub mod signature;

pub use hash::{signing_hash, signing_hash_with, SigningHashAlgorithm};
pub use signature::{
	compose, recover_signer, split, to_signature_bytes, validate_signature,
	COMPOSED_SIGNATURE_LENGTH, SIGNATURE_LENGTH,
};

/// Errors that can occur while encoding, decoding or composing signatures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
	/// Input is not a canonical encoding of a transaction.
	#[error("Malformed encoding: {0}")]
	MalformedEncoding(String),
	/// A signature does not have the fixed length of the scheme.
	#[error("Invalid signature length: expected {expected} bytes, got {actual}")]
	InvalidSignatureLength { expected: usize, actual: usize },
	/// A signature has the right length but cannot be used.
	#[error("Invalid signature: {0}")]
	InvalidSignature(String),
}

/// Encodes a transaction, including its signature field when present.
pub fn encode(tx: &Transaction) -> Vec<u8> {
	let mut payload = Vec::new();
	encode_body_fields(&tx.body, &mut payload);
	if let Some(signature) = &tx.signature {
		rlp::put_blob(signature, &mut payload);
	}

	let mut out = Vec::with_capacity(payload.len() + 9);
	rlp::put_list(&payload, &mut out);
	out
}

/// Encodes a body without a signature field.
///
/// This is the payload sent to the sponsor and the input of the signing hash.
pub fn encode_unsigned(body: &TransactionBody) -> Vec<u8> {
	let mut payload = Vec::new();
	encode_body_fields(body, &mut payload);

	let mut out = Vec::with_capacity(payload.len() + 9);
	rlp::put_list(&payload, &mut out);
	out
}

fn encode_body_fields(body: &TransactionBody, out: &mut Vec<u8>) {
	rlp::put_compact(&[body.chain_tag], out);
	rlp::put_compact(body.block_ref.as_slice(), out);
	rlp::put_compact(&body.expiration.to_be_bytes(), out);

	let mut clauses = Vec::new();
	for clause in &body.clauses {
		let mut fields = Vec::new();
		rlp::put_nullable(clause.to.as_ref().map(|a| a.as_slice()), &mut fields);
		rlp::put_compact(&clause.value.to_be_bytes::<32>(), &mut fields);
		rlp::put_blob(&clause.data, &mut fields);
		rlp::put_list(&fields, &mut clauses);
	}
	rlp::put_list(&clauses, out);

	rlp::put_compact(&[body.gas_price_coef], out);
	rlp::put_compact(&body.gas.to_be_bytes(), out);
	rlp::put_nullable(body.depends_on.as_ref().map(|h| h.as_slice()), out);
	rlp::put_compact(&body.nonce.to_be_bytes(), out);
	encode_reserved(&body.reserved, out);
}

fn encode_reserved(reserved: &Reserved, out: &mut Vec<u8>) {
	let features = reserved.features.to_be_bytes();
	let mut entries: Vec<&[u8]> = Vec::with_capacity(1 + reserved.unused().len());
	entries.push(rlp::trim_leading_zeros(&features));
	entries.extend(reserved.unused().iter().map(|b| b.as_ref()));

	while entries.last().is_some_and(|e| e.is_empty()) {
		entries.pop();
	}

	let mut payload = Vec::new();
	for entry in entries {
		rlp::put_blob(entry, &mut payload);
	}
	rlp::put_list(&payload, out);
}

/// Decodes a signed or unsigned transaction.
///
/// Fails with [`CodecError::MalformedEncoding`] on truncated input, invalid
/// length prefixes, non-canonical fields, a wrong number of fields, trailing
/// bytes, or an empty clause list.
pub fn decode(bytes: &[u8]) -> Result<Transaction, CodecError> {
	let mut input = rlp::Reader::new(bytes);
	let mut fields = input.list("transaction")?;
	input.finish("transaction")?;

	let chain_tag = fields.u8("chain_tag")?;
	let block_ref = BlockRef::from(fields.compact::<8>("block_ref")?);
	let expiration = fields.u32("expiration")?;
	let clauses = decode_clauses(fields.list("clauses")?)?;
	let gas_price_coef = fields.u8("gas_price_coef")?;
	let gas = fields.u64("gas")?;
	let depends_on = fields.nullable::<32>("depends_on")?.map(B256::from);
	let nonce = fields.u64("nonce")?;
	let reserved = decode_reserved(fields.list("reserved")?)?;

	let signature = if fields.is_empty() {
		None
	} else {
		Some(Bytes::copy_from_slice(fields.blob("signature")?))
	};

	if !fields.is_empty() {
		return Err(CodecError::MalformedEncoding(
			"field count mismatch: unexpected fields after signature".into(),
		));
	}

	Ok(Transaction {
		body: TransactionBody {
			chain_tag,
			block_ref,
			expiration,
			clauses,
			gas_price_coef,
			gas,
			depends_on,
			nonce,
			reserved,
		},
		signature,
	})
}

fn decode_clauses(mut list: rlp::Reader<'_>) -> Result<Vec<Clause>, CodecError> {
	let mut clauses = Vec::new();
	while !list.is_empty() {
		let mut fields = list.list("clause")?;
		let to = fields.nullable::<20>("clause.to")?.map(Address::from);
		let value = U256::from_be_bytes(fields.compact::<32>("clause.value")?);
		let data = Bytes::copy_from_slice(fields.blob("clause.data")?);
		fields.finish("clause")?;
		clauses.push(Clause { to, value, data });
	}

	if clauses.is_empty() {
		return Err(CodecError::MalformedEncoding(
			"transaction has no clauses".into(),
		));
	}
	Ok(clauses)
}

fn decode_reserved(mut list: rlp::Reader<'_>) -> Result<Reserved, CodecError> {
	let mut entries = Vec::new();
	while !list.is_empty() {
		entries.push(list.blob("reserved")?);
	}

	if entries.last().is_some_and(|e| e.is_empty()) {
		return Err(CodecError::MalformedEncoding(
			"reserved: trailing empty entry".into(),
		));
	}

	let features = match entries.first() {
		Some(raw) => u32::from_be_bytes(rlp::compact_from_slice::<4>(raw, "reserved.features")?),
		None => 0,
	};
	let unused = entries
		.iter()
		.skip(1)
		.map(|raw| Bytes::copy_from_slice(raw))
		.collect();

	Ok(Reserved::new(features, unused))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;
	use feeless_types::DELEGATION_FEATURE;

	// Reference body and encoding from the thor-devkit transaction tests.
	const REFERENCE_UNSIGNED: &str = "f8540184aabbccdd20f840df947567d83b7b8d80addcb281a71d54fc7b3364ffed82271086000000606060df947567d83b7b8d80addcb281a71d54fc7b3364ffed824e208600000060606081808252088083bc614ec0";

	fn reference_body() -> TransactionBody {
		let to = address!("7567d83b7b8d80addcb281a71d54fc7b3364ffed");
		let data = Bytes::from(vec![0x00, 0x00, 0x00, 0x60, 0x60, 0x60]);
		TransactionBody {
			chain_tag: 1,
			block_ref: "0x00000000aabbccdd".parse().unwrap(),
			expiration: 32,
			clauses: vec![
				Clause {
					to: Some(to),
					value: U256::from(10000),
					data: data.clone(),
				},
				Clause {
					to: Some(to),
					value: U256::from(20000),
					data,
				},
			],
			gas_price_coef: 128,
			gas: 21000,
			depends_on: None,
			nonce: 12345678,
			reserved: Reserved::default(),
		}
	}

	#[test]
	fn test_reference_encoding() {
		let encoded = encode_unsigned(&reference_body());
		assert_eq!(hex::encode(&encoded), REFERENCE_UNSIGNED);
	}

	#[test]
	fn test_delegated_reserved_encoding() {
		let mut body = reference_body();
		body.reserved = Reserved::delegated();

		let encoded = hex::encode(encode_unsigned(&body));
		assert!(encoded.starts_with("f855"));
		assert!(encoded.ends_with("83bc614ec101"));
	}

	#[test]
	fn test_unsigned_and_signed_forms_differ_only_by_signature() {
		let body = reference_body();
		let unsigned = encode(&Transaction::unsigned(body.clone()));
		assert_eq!(unsigned, encode_unsigned(&body));

		let signed = encode(&Transaction::unsigned(body).with_signature(vec![0xab; 130]));
		// both payloads fit a two-byte list header
		assert_eq!(&signed[2..unsigned.len()], &unsigned[2..]);
		assert_eq!(signed.len(), unsigned.len() + 2 + 130);
		assert_eq!(&signed[unsigned.len()..unsigned.len() + 2], &[0xb8, 0x82]);
	}

	#[test]
	fn test_round_trip_unsigned() {
		let tx = Transaction::unsigned(reference_body());
		assert_eq!(decode(&encode(&tx)).unwrap(), tx);
	}

	#[test]
	fn test_round_trip_signed_delegated() {
		let mut body = reference_body();
		body.reserved = Reserved::delegated();
		body.depends_on = Some(B256::repeat_byte(0x42));
		let tx = Transaction::unsigned(body).with_signature(vec![0x5a; COMPOSED_SIGNATURE_LENGTH]);

		let decoded = decode(&encode(&tx)).unwrap();
		assert_eq!(decoded, tx);
		assert_eq!(decoded.signature.unwrap().len(), COMPOSED_SIGNATURE_LENGTH);
	}

	#[test]
	fn test_round_trip_edge_values() {
		let body = TransactionBody {
			chain_tag: 0,
			block_ref: BlockRef::ZERO,
			expiration: u32::MAX,
			clauses: vec![
				Clause {
					to: None,
					value: U256::MAX,
					data: Bytes::from(vec![0x60, 0x80, 0x60, 0x40]),
				},
				Clause {
					to: Some(Address::ZERO),
					value: U256::ZERO,
					data: Bytes::new(),
				},
			],
			gas_price_coef: 255,
			gas: u64::MAX,
			depends_on: None,
			nonce: 0,
			reserved: Reserved::new(0, vec![Bytes::new(), Bytes::from(vec![0x01])]),
		};
		let tx = Transaction::unsigned(body);
		assert_eq!(decode(&encode(&tx)).unwrap(), tx);
	}

	#[test]
	fn test_round_trip_reserved_with_empty_tail() {
		let mut body = reference_body();
		body.reserved = Reserved::new(DELEGATION_FEATURE, vec![Bytes::new()]);
		let tx = Transaction::unsigned(body);

		let decoded = decode(&encode(&tx)).unwrap();
		assert_eq!(decoded, tx);
		assert_eq!(decoded.body.reserved, Reserved::delegated());

		let mut body = reference_body();
		body.reserved = Reserved::new(0, vec![Bytes::new()]);
		let tx = Transaction::unsigned(body);
		assert_eq!(decode(&encode(&tx)).unwrap(), tx);
	}

	#[test]
	fn test_decode_truncated_input() {
		let mut body = reference_body();
		body.reserved = Reserved::delegated();
		let encoded = encode(&Transaction::unsigned(body).with_signature(vec![1u8; 130]));

		let truncated = &encoded[..encoded.len() - 1];
		assert!(matches!(
			decode(truncated),
			Err(CodecError::MalformedEncoding(_))
		));
	}

	#[test]
	fn test_decode_rejects_empty_and_garbage() {
		assert!(matches!(decode(&[]), Err(CodecError::MalformedEncoding(_))));
		assert!(matches!(
			decode(&[0xc0]),
			Err(CodecError::MalformedEncoding(_))
		));
		assert!(matches!(
			decode(&[0x83, 0x01, 0x02, 0x03]),
			Err(CodecError::MalformedEncoding(_))
		));
	}

	#[test]
	fn test_decode_rejects_invalid_length_prefix() {
		let mut encoded = hex::decode(REFERENCE_UNSIGNED).unwrap();
		// claim a longer payload than provided
		encoded[1] = 0x60;
		assert!(matches!(
			decode(&encoded),
			Err(CodecError::MalformedEncoding(_))
		));
	}

	#[test]
	fn test_decode_rejects_extra_fields() {
		let unsigned = hex::decode(REFERENCE_UNSIGNED).unwrap();
		let mut payload = unsigned[2..].to_vec();
		payload.extend_from_slice(&[0x80, 0x01]);

		let mut encoded = Vec::new();
		rlp::put_list(&payload, &mut encoded);

		let err = decode(&encoded).unwrap_err();
		assert!(err.to_string().contains("field count mismatch"));
	}

	#[test]
	fn test_decode_rejects_trailing_bytes() {
		let mut encoded = hex::decode(REFERENCE_UNSIGNED).unwrap();
		encoded.push(0x00);
		assert!(matches!(
			decode(&encoded),
			Err(CodecError::MalformedEncoding(_))
		));
	}

	#[test]
	fn test_decode_rejects_non_canonical_nonce() {
		// nonce written as 0x00bc614e instead of 0xbc614e
		let tampered = REFERENCE_UNSIGNED
			.replacen("f854", "f855", 1)
			.replacen("83bc614e", "8400bc614e", 1);
		let encoded = hex::decode(tampered).unwrap();

		let err = decode(&encoded).unwrap_err();
		assert!(err.to_string().contains("nonce"));
	}

	#[test]
	fn test_decode_rejects_empty_clauses() {
		let mut body = reference_body();
		body.clauses.clear();
		let encoded = encode_unsigned(&body);

		let err = decode(&encoded).unwrap_err();
		assert_eq!(
			err,
			CodecError::MalformedEncoding("transaction has no clauses".into())
		);
	}

	#[test]
	fn test_decode_rejects_untrimmed_reserved() {
		let unsigned = hex::decode(REFERENCE_UNSIGNED).unwrap();
		// replace the empty reserved list `c0` with `[0x01, ""]`
		let mut payload = unsigned[2..unsigned.len() - 1].to_vec();
		payload.extend_from_slice(&[0xc2, 0x01, 0x80]);

		let mut encoded = Vec::new();
		rlp::put_list(&payload, &mut encoded);

		assert!(matches!(
			decode(&encoded),
			Err(CodecError::MalformedEncoding(_))
		));
	}
}
