//! Node access module for the feeless transaction client.
//!
//! This module covers everything the submission flow needs from a full node:
//! reading the best and genesis blocks to derive chain status, dry-running a
//! clause set against best state, and broadcasting a raw transaction.

use alloy_primitives::Address;
use async_trait::async_trait;
use feeless_types::{BlockSummary, ChainStatus, Clause, SimulationResult, TransactionId};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

/// Errors that can occur while talking to a node.
#[derive(Debug, Error)]
pub enum NodeError {
	/// The best or genesis block could not be read.
	#[error("Chain status unavailable: {0}")]
	ChainStatusUnavailable(String),
	/// The simulation endpoint failed or returned an unusable result.
	#[error("Simulation unavailable: {0}")]
	SimulationUnavailable(String),
	/// The node refused the raw transaction.
	///
	/// `status` is absent when the request never produced a response.
	#[error("Submission rejected: {body}")]
	SubmissionRejected { status: Option<u16>, body: String },
	/// The client could not be constructed.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for node backends.
#[async_trait]
pub trait NodeInterface: Send + Sync {
	/// Reads the current best block.
	async fn best_block(&self) -> Result<BlockSummary, NodeError>;

	/// Reads block 0.
	async fn genesis_block(&self) -> Result<BlockSummary, NodeError>;

	/// Executes `clauses` read-only against best state as `caller`.
	///
	/// Returns one result per clause. A reverted clause is a normal result.
	async fn simulate(
		&self,
		clauses: &[Clause],
		caller: Address,
		gas: u64,
	) -> Result<Vec<SimulationResult>, NodeError>;

	/// Broadcasts an encoded signed transaction and returns the id the node assigned.
	async fn submit(&self, raw: &[u8]) -> Result<TransactionId, NodeError>;
}

/// Service wrapping a node backend.
///
/// Adds the checks every backend shares so implementations stay thin.
pub struct NodeService {
	implementation: Box<dyn NodeInterface>,
}

impl NodeService {
	/// Creates a new NodeService with the specified backend.
	pub fn new(implementation: Box<dyn NodeInterface>) -> Self {
		Self { implementation }
	}

	/// Fetches the best and genesis blocks and derives the chain status.
	pub async fn chain_status(&self) -> Result<ChainStatus, NodeError> {
		let best = self.implementation.best_block().await?;
		let genesis = self.implementation.genesis_block().await?;

		let status = ChainStatus::from_blocks(&best, &genesis);
		tracing::debug!(
			best = best.number,
			chain_tag = status.chain_tag,
			block_ref = %status.block_ref,
			"Fetched chain status"
		);
		Ok(status)
	}

	/// Simulates `clauses` and checks that every clause got a result.
	pub async fn simulate(
		&self,
		clauses: &[Clause],
		caller: Address,
		gas: u64,
	) -> Result<Vec<SimulationResult>, NodeError> {
		let results = self.implementation.simulate(clauses, caller, gas).await?;
		if results.len() != clauses.len() {
			return Err(NodeError::SimulationUnavailable(format!(
				"expected {} results, got {}",
				clauses.len(),
				results.len()
			)));
		}
		Ok(results)
	}

	/// Submits a raw transaction.
	pub async fn submit(&self, raw: &[u8]) -> Result<TransactionId, NodeError> {
		self.implementation.submit(raw).await
	}
}
