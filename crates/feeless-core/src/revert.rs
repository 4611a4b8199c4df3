//! Revert reason extraction from simulation results.

use alloy_sol_types::SolValue;
use feeless_types::{to_prefixed_hex, SimulationResult};

/// Selector plus offset word plus length word.
const MIN_ABI_REASON_LENGTH: usize = 4 + 32 + 32;

/// Returns a human readable reason for a reverted simulation result.
///
/// Prefers the ABI-encoded string after the 4-byte selector, then the VM
/// error, then the raw payload as hex.
pub fn decode_revert_reason(result: &SimulationResult) -> String {
	if let Some(reason) = abi_reason(&result.data) {
		return reason;
	}
	if !result.vm_error.is_empty() {
		return result.vm_error.clone();
	}
	if !result.data.is_empty() {
		return to_prefixed_hex(&result.data);
	}
	"reverted without reason".to_string()
}

fn abi_reason(data: &[u8]) -> Option<String> {
	if data.len() < MIN_ABI_REASON_LENGTH {
		return None;
	}
	String::abi_decode(&data[4..], true).ok()
}
