//! HTTP node backend.
//!
//! Talks to the REST API of a thor-family node:
//! `GET /blocks/{best,0}`, `POST /accounts/*` and `POST /transactions`.

use crate::{NodeError, NodeInterface};
use alloy_primitives::Address;
use async_trait::async_trait;
use feeless_types::{to_prefixed_hex, BlockSummary, Clause, SimulationResult, TransactionId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct CallRequest<'a> {
	clauses: &'a [Clause],
	caller: Address,
	gas: u64,
}

#[derive(Serialize)]
struct RawTransaction {
	raw: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
	id: TransactionId,
}

/// Node backend over the node's REST API.
pub struct HttpNode {
	client: reqwest::Client,
	base_url: String,
}

impl HttpNode {
	/// Creates a client for `url` with a per-request `timeout`.
	pub fn new(url: &str, timeout: Duration) -> Result<Self, NodeError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| NodeError::Configuration(e.to_string()))?;

		Ok(Self {
			client,
			base_url: url.trim_end_matches('/').to_string(),
		})
	}

	async fn block(&self, revision: &str) -> Result<BlockSummary, NodeError> {
		let url = format!("{}/blocks/{}", self.base_url, revision);
		let unavailable = |e: String| NodeError::ChainStatusUnavailable(format!("{}: {}", url, e));

		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| unavailable(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(unavailable(format!("status {}", status)));
		}

		// Unknown revisions come back as `null`.
		response
			.json::<Option<BlockSummary>>()
			.await
			.map_err(|e| unavailable(e.to_string()))?
			.ok_or_else(|| unavailable("block not found".into()))
	}
}

#[async_trait]
impl NodeInterface for HttpNode {
	async fn best_block(&self) -> Result<BlockSummary, NodeError> {
		self.block("best").await
	}

	async fn genesis_block(&self) -> Result<BlockSummary, NodeError> {
		self.block("0").await
	}

	async fn simulate(
		&self,
		clauses: &[Clause],
		caller: Address,
		gas: u64,
	) -> Result<Vec<SimulationResult>, NodeError> {
		let url = format!("{}/accounts/*", self.base_url);
		let request = CallRequest {
			clauses,
			caller,
			gas,
		};

		let response = self
			.client
			.post(&url)
			.json(&request)
			.send()
			.await
			.map_err(|e| NodeError::SimulationUnavailable(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(NodeError::SimulationUnavailable(format!(
				"status {}: {}",
				status,
				body.trim()
			)));
		}

		response
			.json::<Vec<SimulationResult>>()
			.await
			.map_err(|e| NodeError::SimulationUnavailable(e.to_string()))
	}

	async fn submit(&self, raw: &[u8]) -> Result<TransactionId, NodeError> {
		let url = format!("{}/transactions", self.base_url);
		let request = RawTransaction {
			raw: to_prefixed_hex(raw),
		};

		let response = self
			.client
			.post(&url)
			.json(&request)
			.send()
			.await
			.map_err(|e| NodeError::SubmissionRejected {
				status: None,
				body: e.to_string(),
			})?;

		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| NodeError::SubmissionRejected {
				status: Some(status.as_u16()),
				body: format!("failed to read response: {}", e),
			})?;
		if !status.is_success() {
			tracing::warn!(status = status.as_u16(), "Node rejected transaction");
			return Err(NodeError::SubmissionRejected {
				status: Some(status.as_u16()),
				body: body.trim().to_string(),
			});
		}

		let parsed: SubmitResponse =
			serde_json::from_str(&body).map_err(|e| NodeError::SubmissionRejected {
				status: Some(status.as_u16()),
				body: format!("unreadable response {:?}: {}", body, e),
			})?;
		Ok(parsed.id)
	}
}
