//! Submission engine that drives one fee-delegated transaction to the node.
//!
//! An attempt walks the stages in [`Stage`] order and never goes back. The
//! origin signer is passed to [`SubmissionEngine::submit`] per attempt; the
//! engine itself only holds the node and sponsor services and the nonce
//! source.

use crate::{decode_revert_reason, NonceGenerator, SubmissionError};
use alloy_primitives::{Address, Bytes, B256};
use feeless_account::AccountInterface;
use feeless_codec::{compose, encode, encode_unsigned, SigningHashAlgorithm};
use feeless_config::TransactionConfig;
use feeless_node::NodeService;
use feeless_sponsor::SponsorService;
use feeless_types::{
	to_prefixed_hex, truncate_id, ChainStatus, Clause, Reserved, Transaction, TransactionBody,
	TransactionId,
};
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// Body parameters that do not come from the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
	/// Blocks after the block reference during which the body is valid.
	pub expiration: u32,
	/// Coefficient applied to the base gas price.
	pub gas_price_coef: u8,
	/// Gas limit override. The best block gas limit is used when `None`.
	pub gas: Option<u64>,
	/// Transaction that must be included first.
	pub depends_on: Option<B256>,
	/// Digest signed by both origin and sponsor.
	pub signing_hash: SigningHashAlgorithm,
}

impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			expiration: 32,
			gas_price_coef: 0,
			gas: None,
			depends_on: None,
			signing_hash: SigningHashAlgorithm::default(),
		}
	}
}

impl From<&TransactionConfig> for EngineSettings {
	fn from(config: &TransactionConfig) -> Self {
		Self {
			expiration: config.expiration,
			gas_price_coef: config.gas_price_coef,
			gas: config.gas,
			depends_on: config.depends_on,
			signing_hash: config.signing_hash,
		}
	}
}

/// Steps of a submission attempt, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	/// Read the best and genesis blocks.
	FetchStatus,
	/// Assemble the delegated body with a fresh nonce.
	BuildUnsigned,
	/// Dry-run the clauses; any revert ends the attempt.
	Simulate,
	/// Send the unsigned encoding to the sponsor.
	RequestSponsorship,
	/// Sign the digest with the origin account.
	ObtainOriginSignature,
	/// Concatenate origin and sponsor signatures.
	Compose,
	/// Encode the signed transaction.
	Encode,
	/// Broadcast the raw transaction.
	Submit,
	/// The node accepted the transaction.
	Done,
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Stage::FetchStatus => "fetch_status",
			Stage::BuildUnsigned => "build_unsigned",
			Stage::Simulate => "simulate",
			Stage::RequestSponsorship => "request_sponsorship",
			Stage::ObtainOriginSignature => "obtain_origin_signature",
			Stage::Compose => "compose",
			Stage::Encode => "encode",
			Stage::Submit => "submit",
			Stage::Done => "done",
		};
		f.write_str(name)
	}
}

/// Drives fee-delegated submissions.
pub struct SubmissionEngine {
	node: Arc<NodeService>,
	sponsor: Arc<SponsorService>,
	nonces: Arc<NonceGenerator>,
	settings: EngineSettings,
}

impl SubmissionEngine {
	/// Creates an engine with its own nonce source.
	pub fn new(
		node: Arc<NodeService>,
		sponsor: Arc<SponsorService>,
		settings: EngineSettings,
	) -> Self {
		Self::with_nonces(node, sponsor, settings, Arc::new(NonceGenerator::new()))
	}

	/// Creates an engine sharing an existing nonce source.
	pub fn with_nonces(
		node: Arc<NodeService>,
		sponsor: Arc<SponsorService>,
		settings: EngineSettings,
		nonces: Arc<NonceGenerator>,
	) -> Self {
		Self {
			node,
			sponsor,
			nonces,
			settings,
		}
	}

	pub fn settings(&self) -> &EngineSettings {
		&self.settings
	}

	/// Runs one attempt and returns the id the node assigned.
	///
	/// A clause that reverts in simulation ends the attempt before the
	/// sponsor is contacted.
	#[instrument(skip_all, fields(clauses = clauses.len(), origin = tracing::field::Empty))]
	pub async fn submit(
		&self,
		account: &dyn AccountInterface,
		clauses: Vec<Clause>,
	) -> Result<TransactionId, SubmissionError> {
		if clauses.is_empty() {
			return Err(SubmissionError::MalformedEncoding(
				"a transaction needs at least one clause".into(),
			));
		}

		let origin = account.address().await?;
		tracing::Span::current().record("origin", tracing::field::display(origin));

		enter(Stage::FetchStatus);
		let status = self.node.chain_status().await?;

		enter(Stage::BuildUnsigned);
		let body = self.build_unsigned(&status, clauses);

		enter(Stage::Simulate);
		self.simulate(&body, origin).await?;

		enter(Stage::RequestSponsorship);
		let unsigned = encode_unsigned(&body);
		let sponsor_signature = self.request_sponsorship(&body, origin, &unsigned).await?;

		enter(Stage::ObtainOriginSignature);
		let hash = self.settings.signing_hash.digest(&unsigned);
		let origin_signature = account.sign_hash(&hash).await?;

		enter(Stage::Compose);
		let signature = compose(&origin_signature, &sponsor_signature)?;

		enter(Stage::Encode);
		let raw = encode(&Transaction::unsigned(body).with_signature(signature));

		enter(Stage::Submit);
		let id = self.node.submit(&raw).await?;

		enter(Stage::Done);
		tracing::info!(tx_id = %id, "Transaction submitted");
		Ok(id)
	}

	fn build_unsigned(&self, status: &ChainStatus, clauses: Vec<Clause>) -> TransactionBody {
		TransactionBody {
			chain_tag: status.chain_tag,
			block_ref: status.block_ref,
			expiration: self.settings.expiration,
			clauses,
			gas_price_coef: self.settings.gas_price_coef,
			gas: self.settings.gas.unwrap_or(status.gas_limit),
			depends_on: self.settings.depends_on,
			nonce: self.nonces.next_nonce(),
			reserved: Reserved::delegated(),
		}
	}

	async fn simulate(&self, body: &TransactionBody, origin: Address) -> Result<(), SubmissionError> {
		let results = self.node.simulate(&body.clauses, origin, body.gas).await?;

		if let Some((clause, result)) = results.iter().enumerate().find(|(_, r)| r.reverted) {
			let reason = decode_revert_reason(result);
			tracing::warn!(clause, reason = %reason, "Simulation reverted");
			return Err(SubmissionError::TransactionWouldRevert { clause, reason });
		}

		let gas_used: u64 = results.iter().map(|r| r.gas_used).sum();
		tracing::debug!(gas_used, gas = body.gas, "Simulation passed");
		Ok(())
	}

	async fn request_sponsorship(
		&self,
		body: &TransactionBody,
		origin: Address,
		unsigned: &[u8],
	) -> Result<Bytes, SubmissionError> {
		if !body.is_delegated() {
			return Err(SubmissionError::MalformedEncoding(
				"body does not request delegated fee payment".into(),
			));
		}
		let signature = self.sponsor.request_sponsorship(origin, unsigned).await?;
		tracing::debug!(
			signature = %truncate_id(&to_prefixed_hex(&signature)),
			"Sponsorship granted"
		);
		Ok(signature)
	}
}

fn enter(stage: Stage) {
	tracing::debug!(stage = %stage, "Entering stage");
}
