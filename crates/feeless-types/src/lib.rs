//! Common types module for the feeless transaction client.
//!
//! This module defines the data model shared by the codec, the node and
//! sponsor clients, and the submission engine. Keeping these types in one
//! place lets every crate agree on what a clause, a transaction body and a
//! simulation result look like on the wire.

/// Block and chain status types derived from the node.
pub mod chain;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Secure string type for private keys.
pub mod secret_string;
/// Simulation result types returned by the node.
pub mod simulation;
/// Transaction body, clause and identifier types.
pub mod transaction;
/// Utility functions for hex formatting.
pub mod utils;

pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use chain::{BlockRef, BlockSummary, ChainStatus};
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use simulation::SimulationResult;
pub use transaction::{
	Clause, Reserved, Transaction, TransactionBody, TransactionId, DELEGATION_FEATURE,
};
pub use utils::{to_prefixed_hex, truncate_id, with_0x_prefix, without_0x_prefix};
