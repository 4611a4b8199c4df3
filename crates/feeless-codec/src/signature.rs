//! Signature layout for fee-delegated transactions.
//!
//! A single secp256k1 signature is 65 bytes: `r (32) || s (32) || recovery_id (1)`
//! with a recovery id of 0 or 1. A delegated transaction carries the origin
//! signature immediately followed by the sponsor signature in one field.
//! This module is the only place that layout is defined.

use crate::CodecError;
use alloy_primitives::{Address, Bytes, PrimitiveSignature, B256, U256};

/// Length of one signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Length of the origin + sponsor signature field.
pub const COMPOSED_SIGNATURE_LENGTH: usize = 2 * SIGNATURE_LENGTH;

fn check_length(signature: &[u8], expected: usize) -> Result<(), CodecError> {
	if signature.len() != expected {
		return Err(CodecError::InvalidSignatureLength {
			expected,
			actual: signature.len(),
		});
	}
	Ok(())
}

/// Concatenates the origin and sponsor signatures, origin first.
pub fn compose(origin: &[u8], sponsor: &[u8]) -> Result<Bytes, CodecError> {
	check_length(origin, SIGNATURE_LENGTH)?;
	check_length(sponsor, SIGNATURE_LENGTH)?;

	let mut out = Vec::with_capacity(COMPOSED_SIGNATURE_LENGTH);
	out.extend_from_slice(origin);
	out.extend_from_slice(sponsor);
	Ok(out.into())
}

/// Splits a composed signature field into `(origin, sponsor)`.
pub fn split(signature: &[u8]) -> Result<(&[u8], &[u8]), CodecError> {
	check_length(signature, COMPOSED_SIGNATURE_LENGTH)?;
	Ok(signature.split_at(SIGNATURE_LENGTH))
}

/// Checks length and recovery id of a single signature.
pub fn validate_signature(signature: &[u8]) -> Result<(), CodecError> {
	check_length(signature, SIGNATURE_LENGTH)?;
	let recovery_id = signature[SIGNATURE_LENGTH - 1];
	if recovery_id > 1 {
		return Err(CodecError::InvalidSignature(format!(
			"recovery id must be 0 or 1, got {}",
			recovery_id
		)));
	}
	Ok(())
}

/// Serializes a secp256k1 signature as `r || s || recovery_id`.
pub fn to_signature_bytes(signature: &PrimitiveSignature) -> [u8; SIGNATURE_LENGTH] {
	let mut out = [0u8; SIGNATURE_LENGTH];
	out[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
	out[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
	out[64] = signature.v() as u8;
	out
}

/// Recovers the address that produced `signature` over `hash`.
pub fn recover_signer(hash: &B256, signature: &[u8]) -> Result<Address, CodecError> {
	validate_signature(signature)?;

	let parsed = PrimitiveSignature::new(
		U256::from_be_slice(&signature[..32]),
		U256::from_be_slice(&signature[32..64]),
		signature[64] == 1,
	);
	parsed
		.recover_address_from_prehash(hash)
		.map_err(|e| CodecError::InvalidSignature(e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_signer::SignerSync;
	use alloy_signer_local::PrivateKeySigner;

	fn sig(fill: u8) -> Vec<u8> {
		let mut s = vec![fill; SIGNATURE_LENGTH];
		s[64] = 1;
		s
	}

	#[test]
	fn test_compose_layout() {
		let origin = sig(0xaa);
		let sponsor = sig(0xbb);

		let composed = compose(&origin, &sponsor).unwrap();
		assert_eq!(composed.len(), origin.len() + sponsor.len());
		assert_eq!(&composed[..SIGNATURE_LENGTH], origin.as_slice());
		assert_eq!(&composed[SIGNATURE_LENGTH..], sponsor.as_slice());
	}

	#[test]
	fn test_compose_rejects_wrong_lengths() {
		let good = sig(0x01);

		assert_eq!(
			compose(&good[..64], &good),
			Err(CodecError::InvalidSignatureLength {
				expected: 65,
				actual: 64
			})
		);
		assert_eq!(
			compose(&good, &[0u8; 66]),
			Err(CodecError::InvalidSignatureLength {
				expected: 65,
				actual: 66
			})
		);
		assert!(compose(&[], &[]).is_err());
	}

	#[test]
	fn test_split_inverts_compose() {
		let origin = sig(0x10);
		let sponsor = sig(0x20);
		let composed = compose(&origin, &sponsor).unwrap();

		let (o, s) = split(&composed).unwrap();
		assert_eq!(o, origin.as_slice());
		assert_eq!(s, sponsor.as_slice());
		assert!(split(&composed[..129]).is_err());
	}

	#[test]
	fn test_validate_signature_recovery_id() {
		let mut s = sig(0x01);
		assert!(validate_signature(&s).is_ok());
		s[64] = 27;
		assert!(matches!(
			validate_signature(&s),
			Err(CodecError::InvalidSignature(_))
		));
	}

	#[test]
	fn test_sign_and_recover() {
		let signer = PrivateKeySigner::random();
		let hash = B256::repeat_byte(0x5c);

		let signature = signer.sign_hash_sync(&hash).unwrap();
		let bytes = to_signature_bytes(&signature);
		assert!(bytes[64] <= 1);

		let recovered = recover_signer(&hash, &bytes).unwrap();
		assert_eq!(recovered, signer.address());

		if let Ok(other) = recover_signer(&B256::repeat_byte(0x5d), &bytes) {
			assert_ne!(other, signer.address());
		}
	}
}
