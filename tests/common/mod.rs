//! Shared helpers for integration tests.

use alloy::primitives::{Address, LogData, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::{SolEvent, SolValue};

use eoa_upgrader::bundler::UserOperationHash;
use eoa_upgrader::events::CounterIncremented;

/// A fixed operation handle for runner tests.
pub fn op_handle() -> UserOperationHash {
    UserOperationHash(B256::repeat_byte(0x42))
}

/// Build a receipt log carrying a `CounterIncremented(value)` from
/// `emitter`.
pub fn counter_log(emitter: Address, value: u64) -> Log {
    let data = LogData::new_unchecked(
        vec![CounterIncremented::SIGNATURE_HASH],
        U256::from(value).abi_encode().into(),
    );
    Log {
        inner: alloy::primitives::Log {
            address: emitter,
            data,
        },
        ..Default::default()
    }
}

/// Build a log from `emitter` that matches no known event shape.
#[allow(dead_code)]
pub fn unrelated_log(emitter: Address) -> Log {
    let data = LogData::new_unchecked(vec![B256::repeat_byte(0xee)], vec![0xff].into());
    Log {
        inner: alloy::primitives::Log {
            address: emitter,
            data,
        },
        ..Default::default()
    }
}
