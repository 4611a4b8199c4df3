//! Ephemeral account with a freshly generated key.
//!
//! Useful against a sponsor that pays for any origin: the key only has to
//! live for one submission.

use super::local::LocalAccount;
use crate::{AccountError, AccountInterface};
use alloy_signer_local::PrivateKeySigner;

/// Factory function to create an account with a random key.
///
/// Configuration parameters:
/// - None
pub fn create_account(_config: &toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> {
	let signer = PrivateKeySigner::random();
	tracing::info!(address = %signer.address(), "Generated ephemeral account");
	Ok(Box::new(LocalAccount::from_signer(signer)))
}

/// Registry for the ephemeral account implementation.
pub struct Registry;

impl feeless_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "ephemeral";
	type Factory = crate::AccountFactory;

	fn factory() -> Self::Factory {
		create_account
	}
}

impl crate::AccountRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_each_account_is_distinct() {
		let config = toml::Value::Table(Default::default());
		let a = create_account(&config).unwrap();
		let b = create_account(&config).unwrap();
		assert_ne!(a.address().await.unwrap(), b.address().await.unwrap());
	}
}
