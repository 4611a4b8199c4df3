//! Account management module for the feeless transaction client.
//!
//! The origin signer is a capability handed to each submission attempt. This
//! module defines that capability and the implementations selectable from
//! configuration.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use feeless_types::ImplementationRegistry;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod ephemeral;
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when interacting with the account implementation.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Trait defining the interface for origin signers.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Retrieves the address associated with this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a 32-byte digest.
	///
	/// Returns the 65-byte `r || s || recovery_id` form used in the
	/// transaction signature field.
	async fn sign_hash(&self, hash: &B256) -> Result<Bytes, AccountError>;
}

/// Type alias for account factory functions.
pub type AccountFactory = fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError>;

/// Registry trait for account implementations.
pub trait AccountRegistry: ImplementationRegistry<Factory = AccountFactory> {}

/// Get all registered account implementations.
///
/// Returns a vector of (name, factory) tuples for all available account implementations.
pub fn get_all_implementations() -> Vec<(&'static str, AccountFactory)> {
	use implementations::{ephemeral, local};

	vec![
		(local::Registry::NAME, local::Registry::factory()),
		(ephemeral::Registry::NAME, ephemeral::Registry::factory()),
	]
}
