//! Configuration loading from the process environment.

use alloy::primitives::{Address, Bytes, U256};
use thiserror::Error;

use crate::bundler::types::ChainId;
use crate::config::schema::{
    UpgraderConfig, DEFAULT_TARGET_ADDRESS, DEFAULT_TIMEOUT_SECS, SEPOLIA_CHAIN_ID,
};

/// Environment variable holding the Alchemy API key.
pub const API_KEY_ENV_VAR: &str = "ALCHEMY_API_KEY";

/// Environment variable overriding the call target.
pub const TARGET_ADDRESS_ENV_VAR: &str = "TARGET_ADDRESS";

/// Environment variable holding the gas sponsorship policy id.
pub const GAS_POLICY_ENV_VAR: &str = "ALCHEMY_GAS_POLICY_ID";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable {name}. {guidance}")]
    Missing {
        name: &'static str,
        guidance: &'static str,
    },

    /// An environment variable is present but unparseable.
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Load and validate configuration from the process environment.
pub fn load_config() -> Result<UpgraderConfig, ConfigError> {
    load_from(|name| std::env::var(name).ok())
}

/// Load configuration from an arbitrary variable lookup.
///
/// Split out from [`load_config`] so tests can exercise the loader
/// without mutating the process environment.
pub fn load_from<F>(lookup: F) -> Result<UpgraderConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup(API_KEY_ENV_VAR).ok_or(ConfigError::Missing {
        name: API_KEY_ENV_VAR,
        guidance: "Get a free API key at https://dashboard.alchemy.com/apps \
                   and export it before running",
    })?;

    let target_raw =
        lookup(TARGET_ADDRESS_ENV_VAR).unwrap_or_else(|| DEFAULT_TARGET_ADDRESS.to_string());
    let target_address: Address =
        target_raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Invalid {
                name: TARGET_ADDRESS_ENV_VAR,
                reason: format!("'{}' is not a 20-byte hex address: {}", target_raw, e),
            })?;

    // Empty string is treated the same as unset; dashboards sometimes
    // export blank values.
    let gas_policy_id = lookup(GAS_POLICY_ENV_VAR).filter(|v| !v.trim().is_empty());

    Ok(UpgraderConfig {
        api_key,
        chain: ChainId(SEPOLIA_CHAIN_ID),
        target_address,
        value: U256::ZERO,
        call_data: Bytes::new(),
        gas_policy_id,
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        verify_sponsorship: false,
        decode_event: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(vars: &HashMap<String, String>) -> Result<UpgraderConfig, ConfigError> {
        load_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let vars = env(&[]);
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { name, .. } if name == API_KEY_ENV_VAR));
        assert!(err.to_string().contains("dashboard.alchemy.com"));
    }

    #[test]
    fn test_defaults_applied() {
        let vars = env(&[("ALCHEMY_API_KEY", "key")]);
        let config = load(&vars).unwrap();
        assert_eq!(
            config.target_address,
            DEFAULT_TARGET_ADDRESS.parse::<Address>().unwrap()
        );
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.chain.0, SEPOLIA_CHAIN_ID);
        assert!(config.gas_policy_id.is_none());
        assert!(!config.sponsored());
    }

    #[test]
    fn test_invalid_target_address_rejected() {
        let vars = env(&[("ALCHEMY_API_KEY", "key"), ("TARGET_ADDRESS", "not-an-address")]);
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == TARGET_ADDRESS_ENV_VAR));
    }

    #[test]
    fn test_policy_id_toggles_sponsorship() {
        let vars = env(&[
            ("ALCHEMY_API_KEY", "key"),
            ("ALCHEMY_GAS_POLICY_ID", "pol-123"),
        ]);
        let config = load(&vars).unwrap();
        assert_eq!(config.gas_policy_id.as_deref(), Some("pol-123"));
        assert!(config.sponsored());
    }

    #[test]
    fn test_blank_policy_id_ignored() {
        let vars = env(&[("ALCHEMY_API_KEY", "key"), ("ALCHEMY_GAS_POLICY_ID", "  ")]);
        let config = load(&vars).unwrap();
        assert!(config.gas_policy_id.is_none());
    }
}
