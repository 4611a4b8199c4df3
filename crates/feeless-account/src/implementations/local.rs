//! Local private-key account.
//!
//! Signs with a secp256k1 key held in process memory.

use crate::{AccountError, AccountInterface};
use alloy_primitives::{Address, Bytes, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use feeless_codec::to_signature_bytes;
use feeless_types::{without_0x_prefix, SecretString};

/// Account backed by an in-memory private key.
pub struct LocalAccount {
	signer: PrivateKeySigner,
}

impl LocalAccount {
	/// Parses a hex private key, with or without `0x`.
	pub fn new(private_key: &SecretString) -> Result<Self, AccountError> {
		if private_key.is_blank() {
			return Err(AccountError::InvalidKey("private_key is empty".into()));
		}

		let signer = private_key.with_exposed(|key| {
			without_0x_prefix(key.trim())
				.parse::<PrivateKeySigner>()
				.map_err(|e| AccountError::InvalidKey(e.to_string()))
		})?;

		Ok(Self { signer })
	}

	/// Wraps an existing signer.
	pub fn from_signer(signer: PrivateKeySigner) -> Self {
		Self { signer }
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_hash(&self, hash: &B256) -> Result<Bytes, AccountError> {
		let signature = self
			.signer
			.sign_hash(hash)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		Ok(Bytes::copy_from_slice(&to_signature_bytes(&signature)))
	}
}

/// Factory function to create a local account from configuration.
///
/// Configuration parameters:
/// - `private_key` (required): hex-encoded secp256k1 key
pub fn create_account(config: &toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> {
	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.map(SecretString::from)
		.ok_or_else(|| AccountError::InvalidKey("private_key is required".into()))?;

	let account = LocalAccount::new(&private_key)?;
	tracing::debug!(address = %account.signer.address(), "Loaded local account");
	Ok(Box::new(account))
}

/// Registry for the local account implementation.
pub struct Registry;

impl feeless_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "local";
	type Factory = crate::AccountFactory;

	fn factory() -> Self::Factory {
		create_account
	}
}

impl crate::AccountRegistry for Registry {}
