//! Scan receipt logs for the demo counter event.

use alloy::primitives::{Address, U256};
use alloy::rpc::types::Log;
use alloy::sol;

sol! {
    /// Emitted by the demo target contract when its counter advances.
    #[derive(Debug)]
    event CounterIncremented(uint256 newValue);
}

/// Find the first `CounterIncremented` emitted by `contract` and return
/// its value.
///
/// Only logs whose emitting address equals `contract` are considered;
/// address comparison is case-insensitive by construction since both
/// sides are parsed 20-byte addresses. Candidates that fail to decode
/// are skipped silently; foreign events on the same contract are
/// expected. Exhausting the list yields `None`, which is a normal
/// outcome, not an error.
pub fn scan_for_counter_event(logs: &[Log], contract: Address) -> Option<U256> {
    for log in logs {
        if log.address() != contract {
            continue;
        }
        if let Ok(decoded) = log.log_decode::<CounterIncremented>() {
            let value = decoded.inner.newValue;
            tracing::debug!(contract = %contract, value = %value, "Counter event decoded");
            return Some(value);
        }
    }
    None
}
