//! Submission engine for fee-delegated transactions.
//!
//! This module wires the node, the sponsor and an origin signer into one
//! linear flow: read chain status, build the unsigned body, simulate it,
//! obtain the sponsor and origin signatures, compose them and submit. Any
//! failure ends the attempt and is reported as a [`SubmissionError`].

use feeless_account::AccountError;
use feeless_codec::CodecError;
use feeless_node::NodeError;
use feeless_sponsor::SponsorError;
use thiserror::Error;

pub mod builder;
pub mod engine;
pub mod nonce;
pub mod revert;

pub use builder::{BuilderError, EngineBuilder};
pub use engine::{EngineSettings, Stage, SubmissionEngine};
pub use nonce::NonceGenerator;
pub use revert::decode_revert_reason;

/// Errors that end a submission attempt.
#[derive(Debug, Error)]
pub enum SubmissionError {
	/// Error that occurs when the best or genesis block cannot be read.
	#[error("Chain status unavailable: {0}")]
	ChainStatusUnavailable(String),
	/// Error that occurs when the node cannot simulate the clauses.
	#[error("Simulation unavailable: {0}")]
	SimulationUnavailable(String),
	/// A clause reverted in simulation. `clause` is the lowest reverted index.
	#[error("Transaction would revert at clause {clause}: {reason}")]
	TransactionWouldRevert { clause: usize, reason: String },
	/// Error that occurs when the sponsor cannot be reached or times out.
	#[error("Sponsorship unavailable: {0}")]
	SponsorshipUnavailable(String),
	/// Error that occurs when the sponsor declines to pay.
	#[error("Sponsorship rejected with status {status}: {body}")]
	SponsorshipRejected { status: u16, body: String },
	/// Error that occurs when the sponsor returns an unusable signature.
	#[error("Invalid sponsor signature: {0}")]
	InvalidSponsorSignature(String),
	/// Error that occurs when a signature is not exactly 65 bytes.
	#[error("Invalid signature length: expected {expected} bytes, got {actual}")]
	InvalidSignatureLength { expected: usize, actual: usize },
	/// Error that occurs when a transaction cannot be encoded or decoded.
	#[error("Malformed encoding: {0}")]
	MalformedEncoding(String),
	/// Error that occurs when the node refuses the signed transaction.
	#[error("Submission rejected: {body}")]
	SubmissionRejected { status: Option<u16>, body: String },
	/// The origin signer could not produce an address or a signature.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
}

impl From<NodeError> for SubmissionError {
	fn from(err: NodeError) -> Self {
		match err {
			NodeError::ChainStatusUnavailable(msg) => Self::ChainStatusUnavailable(msg),
			NodeError::SimulationUnavailable(msg) => Self::SimulationUnavailable(msg),
			NodeError::SubmissionRejected { status, body } => {
				Self::SubmissionRejected { status, body }
			},
			// A node client that failed to build cannot report status either.
			NodeError::Configuration(msg) => Self::ChainStatusUnavailable(msg),
		}
	}
}

impl From<SponsorError> for SubmissionError {
	fn from(err: SponsorError) -> Self {
		match err {
			SponsorError::Unavailable(msg) | SponsorError::Configuration(msg) => {
				Self::SponsorshipUnavailable(msg)
			},
			SponsorError::Rejected { status, body } => Self::SponsorshipRejected { status, body },
			SponsorError::InvalidSignature(msg) => Self::InvalidSponsorSignature(msg),
		}
	}
}

impl From<CodecError> for SubmissionError {
	fn from(err: CodecError) -> Self {
		match err {
			CodecError::MalformedEncoding(msg) => Self::MalformedEncoding(msg),
			CodecError::InvalidSignatureLength { expected, actual } => {
				Self::InvalidSignatureLength { expected, actual }
			},
			CodecError::InvalidSignature(msg) => Self::SigningFailed(msg),
		}
	}
}

impl From<AccountError> for SubmissionError {
	fn from(err: AccountError) -> Self {
		Self::SigningFailed(err.to_string())
	}
}
