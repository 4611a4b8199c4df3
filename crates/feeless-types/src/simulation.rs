//! Simulation result types.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one clause against the best state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
	/// Whether the clause aborted.
	pub reverted: bool,
	/// ABI-encoded revert payload, or empty.
	#[serde(default)]
	pub data: Bytes,
	/// Engine-level failure description.
	#[serde(default)]
	pub vm_error: String,
	/// Gas consumed by the clause.
	#[serde(default)]
	pub gas_used: u64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_deserialize_node_response() {
		let json = r#"[
			{"data":"0x","events":[],"transfers":[],"gasUsed":5423,"reverted":false,"vmError":""},
			{"data":"0x","events":[],"transfers":[],"gasUsed":0,"reverted":true,"vmError":"out of gas"}
		]"#;

		let results: Vec<SimulationResult> = serde_json::from_str(json).unwrap();
		assert_eq!(results.len(), 2);
		assert!(!results[0].reverted);
		assert_eq!(results[0].gas_used, 5423);
		assert!(results[1].reverted);
		assert_eq!(results[1].vm_error, "out of gas");
		assert!(results[1].data.is_empty());
	}
}
