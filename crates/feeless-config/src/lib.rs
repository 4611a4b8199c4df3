//! Configuration module for the feeless transaction client.
//!
//! This module provides structures and utilities for loading the client
//! configuration from TOML. `${VAR}` and `${VAR:-default}` references are
//! resolved from the environment before parsing, and the parsed result is
//! validated before it is handed out.

use alloy_primitives::B256;
use feeless_codec::SigningHashAlgorithm;
use feeless_types::Clause;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Node the transaction is simulated against and submitted to.
	pub node: NodeConfig,
	/// Gas-payer service.
	pub sponsor: SponsorConfig,
	/// Origin signer selection.
	pub account: AccountConfig,
	/// Transaction parameters and clauses.
	pub transaction: TransactionConfig,
}

/// Configuration for the node REST API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
	/// Base URL, e.g. `https://node-testnet.vechain.energy`.
	pub url: String,
	/// Per-request timeout in seconds.
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
}

impl NodeConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_seconds)
	}
}

/// Configuration for the sponsorship service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SponsorConfig {
	/// Base URL of the gas-payer service.
	pub url: String,
	/// Service identifier appended as `/by/{service_id}`.
	pub service_id: String,
	/// Per-request timeout in seconds.
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
}

impl SponsorConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_seconds)
	}
}

/// Configuration for account management.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of account implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Transaction parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransactionConfig {
	/// Validity window in blocks after the block reference.
	#[serde(default = "default_expiration")]
	pub expiration: u32,
	#[serde(default)]
	pub gas_price_coef: u8,
	/// Gas limit. The best block gas limit is used when absent.
	#[serde(default)]
	pub gas: Option<u64>,
	/// Transaction that must be included before this one.
	#[serde(default)]
	pub depends_on: Option<B256>,
	/// Digest both parties sign.
	#[serde(default)]
	pub signing_hash: SigningHashAlgorithm,
	/// Clauses, executed in order.
	#[serde(default)]
	pub clauses: Vec<Clause>,
}

/// Returns the default per-request timeout in seconds.
fn default_timeout_seconds() -> u64 {
	30
}

/// Returns the default expiration in blocks.
fn default_expiration() -> u32 {
	32
}

const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

fn validate_url(section: &str, url: &str) -> Result<(), ConfigError> {
	let rest = url
		.strip_prefix("https://")
		.or_else(|| url.strip_prefix("http://"))
		.ok_or_else(|| {
			ConfigError::Validation(format!(
				"{}.url must start with http:// or https://, got '{}'",
				section, url
			))
		})?;

	let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
	if host.is_empty() || host.contains(char::is_whitespace) {
		return Err(ConfigError::Validation(format!(
			"{}.url has no valid host: '{}'",
			section, url
		)));
	}
	Ok(())
}

fn validate_timeout(section: &str, seconds: u64) -> Result<(), ConfigError> {
	if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
		return Err(ConfigError::Validation(format!(
			"{}.timeout_seconds must be between 1 and {}, got {}",
			section, MAX_TIMEOUT_SECONDS, seconds
		)));
	}
	Ok(())
}

impl Config {
	/// Loads configuration from a file with environment variable resolution.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		validate_url("node", &self.node.url)?;
		validate_timeout("node", self.node.timeout_seconds)?;

		validate_url("sponsor", &self.sponsor.url)?;
		validate_timeout("sponsor", self.sponsor.timeout_seconds)?;
		if self.sponsor.service_id.trim().is_empty() {
			return Err(ConfigError::Validation(
				"sponsor.service_id cannot be empty".into(),
			));
		}

		if self.account.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Account primary implementation cannot be empty".into(),
			));
		}
		if !self
			.account
			.implementations
			.contains_key(&self.account.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary account '{}' not found in implementations",
				self.account.primary
			)));
		}

		if self.transaction.expiration == 0 {
			return Err(ConfigError::Validation(
				"transaction.expiration must be greater than 0".into(),
			));
		}
		if self.transaction.gas == Some(0) {
			return Err(ConfigError::Validation(
				"transaction.gas must be greater than 0 when set".into(),
			));
		}
		if self.transaction.clauses.is_empty() {
			return Err(ConfigError::Validation(
				"At least one transaction clause must be configured".into(),
			));
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
