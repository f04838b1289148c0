//! Configuration schema definitions.

use alloy::primitives::{Address, Bytes, U256};

use crate::bundler::types::ChainId;

/// Default call target when `TARGET_ADDRESS` is not set.
pub const DEFAULT_TARGET_ADDRESS: &str = "0x9D3c19e01FBF90a7883396B5BBc5dbF7a1142531";

/// Default deadline for the submission attempt.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sepolia testnet, the only chain this tool targets.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Root configuration for the upgrade tool.
///
/// Built from the process environment by [`crate::config::load_config`],
/// then adjusted by CLI flags in `main`.
#[derive(Clone)]
pub struct UpgraderConfig {
    /// Alchemy API key for bundler and node RPC access.
    pub api_key: String,

    /// Chain the operation is submitted against.
    pub chain: ChainId,

    /// Call target of the user operation.
    pub target_address: Address,

    /// Native value attached to the call, in wei.
    pub value: U256,

    /// Opaque call data forwarded to the target.
    pub call_data: Bytes,

    /// Gas sponsorship policy. Presence toggles paymaster integration.
    pub gas_policy_id: Option<String>,

    /// Deadline for the submission attempt, in seconds.
    pub timeout_secs: u64,

    /// Whether to check who paid gas after confirmation.
    pub verify_sponsorship: bool,

    /// Whether to scan the receipt for the counter event.
    pub decode_event: bool,
}

impl UpgraderConfig {
    /// True when a sponsorship policy is configured.
    pub fn sponsored(&self) -> bool {
        self.gas_policy_id.is_some()
    }
}

impl std::fmt::Debug for UpgraderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpgraderConfig")
            .field("api_key", &"<redacted>")
            .field("chain", &self.chain)
            .field("target_address", &self.target_address)
            .field("value", &self.value)
            .field("call_data", &self.call_data)
            .field("gas_policy_id", &self.gas_policy_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("verify_sponsorship", &self.verify_sponsorship)
            .field("decode_event", &self.decode_event)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target_parses() {
        let addr: Address = DEFAULT_TARGET_ADDRESS.parse().unwrap();
        assert_ne!(addr, Address::ZERO);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = UpgraderConfig {
            api_key: "super-secret".to_string(),
            chain: ChainId(SEPOLIA_CHAIN_ID),
            target_address: Address::ZERO,
            value: U256::ZERO,
            call_data: Bytes::new(),
            gas_policy_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_sponsorship: false,
            decode_event: false,
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
