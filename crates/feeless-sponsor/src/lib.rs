//! Fee sponsorship module for the feeless transaction client.
//!
//! A sponsor (gas payer) reviews an encoded unsigned transaction together
//! with the intended origin and, if it agrees to pay, returns its own
//! 65-byte signature. The signature is checked for shape here so the rest of
//! the flow can treat it as opaque bytes.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

/// Errors that can occur while requesting sponsorship.
#[derive(Debug, Error)]
pub enum SponsorError {
	/// The sponsor could not be reached or did not answer in time.
	#[error("Sponsorship unavailable: {0}")]
	Unavailable(String),
	/// The sponsor answered with a non-success status.
	#[error("Sponsorship rejected with status {status}: {body}")]
	Rejected { status: u16, body: String },
	/// The sponsor answered but the signature is unusable.
	#[error("Invalid sponsor signature: {0}")]
	InvalidSignature(String),
	/// The client could not be constructed.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for sponsorship backends.
#[async_trait]
pub trait SponsorInterface: Send + Sync {
	/// Asks the sponsor to co-sign `raw`, the encoded unsigned transaction
	/// that `origin` intends to send.
	///
	/// Returns the sponsor's 65-byte signature.
	async fn request_sponsorship(&self, origin: Address, raw: &[u8]) -> Result<Bytes, SponsorError>;
}

/// Service wrapping a sponsorship backend.
pub struct SponsorService {
	implementation: Box<dyn SponsorInterface>,
}

impl SponsorService {
	/// Creates a new SponsorService with the specified backend.
	pub fn new(implementation: Box<dyn SponsorInterface>) -> Self {
		Self { implementation }
	}

	/// Requests sponsorship and checks the returned signature layout.
	pub async fn request_sponsorship(
		&self,
		origin: Address,
		raw: &[u8],
	) -> Result<Bytes, SponsorError> {
		let signature = self.implementation.request_sponsorship(origin, raw).await?;
		feeless_codec::validate_signature(&signature)
			.map_err(|e| SponsorError::InvalidSignature(e.to_string()))?;
		Ok(signature)
	}
}
