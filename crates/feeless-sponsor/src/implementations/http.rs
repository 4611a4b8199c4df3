//! HTTP sponsorship backend.
//!
//! Posts `{ origin, raw }` to `{url}/by/{service_id}` and reads back
//! `{ signature }`, all values as `0x` hex strings.

use crate::{SponsorError, SponsorInterface};
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use feeless_types::{to_prefixed_hex, without_0x_prefix};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct SponsorRequest {
	origin: Address,
	raw: String,
}

#[derive(Deserialize)]
struct SponsorResponse {
	signature: String,
}

/// Sponsorship backend over a gas-payer HTTP service.
pub struct HttpSponsor {
	client: reqwest::Client,
	endpoint: String,
}

impl HttpSponsor {
	/// Creates a client for `service_id` at `url` with a per-request `timeout`.
	pub fn new(url: &str, service_id: &str, timeout: Duration) -> Result<Self, SponsorError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| SponsorError::Configuration(e.to_string()))?;

		Ok(Self {
			client,
			endpoint: format!("{}/by/{}", url.trim_end_matches('/'), service_id),
		})
	}
}

#[async_trait]
impl SponsorInterface for HttpSponsor {
	async fn request_sponsorship(&self, origin: Address, raw: &[u8]) -> Result<Bytes, SponsorError> {
		let request = SponsorRequest {
			origin,
			raw: to_prefixed_hex(raw),
		};

		tracing::debug!(endpoint = %self.endpoint, origin = %origin, "Requesting sponsorship");
		let response = self
			.client
			.post(&self.endpoint)
			.json(&request)
			.send()
			.await
			.map_err(|e| SponsorError::Unavailable(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(SponsorError::Rejected {
				status: status.as_u16(),
				body: body.trim().to_string(),
			});
		}

		// A body that stalls or breaks off is a transport failure.
		let body = response
			.bytes()
			.await
			.map_err(|e| SponsorError::Unavailable(format!("failed to read response: {}", e)))?;
		let parsed: SponsorResponse = serde_json::from_slice(&body)
			.map_err(|e| SponsorError::InvalidSignature(format!("unreadable response: {}", e)))?;

		hex::decode(without_0x_prefix(&parsed.signature))
			.map(Bytes::from)
			.map_err(|e| SponsorError::InvalidSignature(e.to_string()))
	}
}
