//! Factory registry for pluggable implementations.
//!
//! Collects every account implementation once and resolves the names used
//! in configuration to factory functions.

use feeless_account::AccountFactory;
use feeless_account::AccountInterface;
use feeless_config::Config;
use feeless_core::{EngineBuilder, SubmissionEngine};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Global registry for all implementation factories
pub struct FactoryRegistry {
	pub account: HashMap<String, AccountFactory>,
}

impl FactoryRegistry {
	/// Create a new empty registry
	pub fn new() -> Self {
		Self {
			account: HashMap::new(),
		}
	}

	/// Register an account implementation
	pub fn register_account(&mut self, name: impl Into<String>, factory: AccountFactory) {
		self.account.insert(name.into(), factory);
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Get the global factory registry, initializing it on first use.
pub fn get_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in feeless_account::get_all_implementations() {
			tracing::debug!("Registering account implementation: {}", name);
			registry.register_account(name, factory);
		}

		registry
	})
}

/// Builds the engine and primary account from configuration.
///
/// Fails on any configured implementation name the registry does not know.
pub fn build_engine_from_config(
	config: Config,
) -> Result<(SubmissionEngine, Box<dyn AccountInterface>), Box<dyn std::error::Error>> {
	let registry = get_registry();

	let mut account_factories = HashMap::new();
	for name in config.account.implementations.keys() {
		match registry.account.get(name) {
			Some(factory) => {
				account_factories.insert(name.clone(), *factory);
			},
			None => {
				let mut available: Vec<_> = registry.account.keys().cloned().collect();
				available.sort();
				return Err(format!(
					"Unknown account implementation '{}'. Available: [{}]",
					name,
					available.join(", ")
				)
				.into());
			},
		}
	}

	Ok(EngineBuilder::new(config).build(account_factories)?)
}
