//! Builder pattern for constructing submission engines.
//!
//! Turns a validated [`Config`] into a [`SubmissionEngine`] backed by the
//! HTTP node and sponsor clients, plus the primary origin account created
//! through the supplied account factories.

use crate::engine::{EngineSettings, SubmissionEngine};
use feeless_account::{AccountError, AccountInterface};
use feeless_config::Config;
use feeless_node::{implementations::http::HttpNode, NodeService};
use feeless_sponsor::{implementations::http::HttpSponsor, SponsorService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for constructing a SubmissionEngine from configuration.
pub struct EngineBuilder {
	config: Config,
}

impl EngineBuilder {
	/// Creates a new EngineBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the engine and the primary origin account.
	pub fn build<AF>(
		self,
		account_factories: HashMap<String, AF>,
	) -> Result<(SubmissionEngine, Box<dyn AccountInterface>), BuilderError>
	where
		AF: Fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError>,
	{
		let node = HttpNode::new(&self.config.node.url, self.config.node.timeout()).map_err(|e| {
			BuilderError::Config(format!("Failed to create node client: {}", e))
		})?;
		tracing::info!(component = "node", implementation = "http", url = %self.config.node.url, "Loaded");

		let sponsor = HttpSponsor::new(
			&self.config.sponsor.url,
			&self.config.sponsor.service_id,
			self.config.sponsor.timeout(),
		)
		.map_err(|e| BuilderError::Config(format!("Failed to create sponsor client: {}", e)))?;
		tracing::info!(
			component = "sponsor",
			implementation = "http",
			url = %self.config.sponsor.url,
			service_id = %self.config.sponsor.service_id,
			"Loaded"
		);

		// Create account implementations
		let mut account_impls = HashMap::new();
		for (name, config) in &self.config.account.implementations {
			if let Some(factory) = account_factories.get(name) {
				match factory(config) {
					Ok(implementation) => {
						account_impls.insert(name.clone(), implementation);
						let is_primary = &self.config.account.primary == name;
						tracing::info!(component = "account", implementation = %name, enabled = %is_primary, "Loaded");
					},
					Err(e) => {
						tracing::error!(
							component = "account",
							implementation = %name,
							error = %e,
							"Failed to create account implementation"
						);
						return Err(BuilderError::Config(format!(
							"Failed to create account implementation '{}': {}",
							name, e
						)));
					},
				}
			} else {
				tracing::warn!(component = "account", implementation = %name, "No factory registered");
			}
		}

		let primary = self.config.account.primary.as_str();
		let account = account_impls.remove(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!("primary account '{}'", primary))
		})?;

		let engine = SubmissionEngine::new(
			Arc::new(NodeService::new(Box::new(node))),
			Arc::new(SponsorService::new(Box::new(sponsor))),
			EngineSettings::from(&self.config.transaction),
		);

		Ok((engine, account))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use feeless_account::{get_all_implementations, AccountFactory};
	use feeless_codec::SigningHashAlgorithm;

	fn config(primary: &str) -> Config {
		format!(
			r#"
[node]
url = "http://127.0.0.1:8669"

[sponsor]
url = "http://127.0.0.1:3000"
service_id = "90"

[account]
primary = "{}"
[account.implementations.local]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
[account.implementations.ephemeral]

[transaction]
gas = 90000
signing_hash = "blake2b256"

[[transaction.clauses]]
to = "0x8384738c995d49c5b692560ae688fc8b51af1059"
data = "0xd09de08a"
"#,
			primary
		)
		.parse()
		.unwrap()
	}

	fn factories() -> HashMap<String, AccountFactory> {
		get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect()
	}

	#[tokio::test]
	async fn test_builds_engine_with_primary_account() {
		let (engine, account) = EngineBuilder::new(config("local")).build(factories()).unwrap();

		assert_eq!(
			account.address().await.unwrap().to_string(),
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
		);
		assert_eq!(engine.settings().gas, Some(90_000));
		assert_eq!(
			engine.settings().signing_hash,
			SigningHashAlgorithm::Blake2b256
		);
	}

	#[test]
	fn test_missing_factory_for_primary() {
		let mut factories = factories();
		factories.remove("ephemeral");

		assert!(matches!(
			EngineBuilder::new(config("ephemeral")).build(factories),
			Err(BuilderError::MissingComponent(_))
		));
	}

	#[test]
	fn test_factory_failure_is_reported() {
		let mut factories = factories();
		let failing: AccountFactory = |_| Err(AccountError::InvalidKey("unsupported".into()));
		factories.insert("local".to_string(), failing);

		match EngineBuilder::new(config("ephemeral")).build(factories) {
			Err(BuilderError::Config(msg)) => assert!(msg.contains("'local'")),
			Err(other) => panic!("expected config error, got {:?}", other),
			Ok(_) => panic!("expected config error"),
		}
	}
}
