//! Main entry point for the feeless client.
//!
//! Loads the configuration, builds the submission engine and sends the
//! configured clauses as one fee-delegated transaction. The transaction id
//! is printed on stdout; any failure exits non-zero with the error.

use clap::Parser;
use feeless_config::Config;
use std::path::PathBuf;

mod factory_registry;

/// Command-line arguments for the feeless client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or_else(|| format!("Config path is not valid UTF-8: {}", args.config.display()))?;
	let config = Config::from_file(config_path).await?;
	tracing::info!(
		path = %config_path,
		node = %config.node.url,
		sponsor = %config.sponsor.url,
		"Loaded configuration"
	);

	let clauses = config.transaction.clauses.clone();
	let (engine, account) = factory_registry::build_engine_from_config(config)?;

	match engine.submit(account.as_ref(), clauses).await {
		Ok(id) => {
			println!("{}", id);
			Ok(())
		},
		Err(e) => {
			tracing::error!(error = %e, "Submission failed");
			Err(e.into())
		},
	}
}
