//! Bundler-facing types and error definitions.

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Hash identifying a submitted user operation at the bundler.
///
/// Distinct from the transaction hash the operation eventually lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserOperationHash(pub B256);

impl std::fmt::Display for UserOperationHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the caller asks the smart account to do: a single call.
///
/// The target is a typed 20-byte address, so a malformed address is
/// rejected at parse time; the value is a U256 and cannot be negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOperationRequest {
    /// Call target.
    pub target: Address,
    /// Native value in wei.
    pub value: U256,
    /// Opaque call data.
    pub data: Bytes,
}

impl UserOperationRequest {
    /// A plain call with no value and no data, enough to trigger the
    /// EIP-7702 delegation.
    pub fn bare_call(target: Address) -> Self {
        Self {
            target,
            value: U256::ZERO,
            data: Bytes::new(),
        }
    }
}

/// Errors that can occur while talking to the bundler or the node.
#[derive(Debug, Error)]
pub enum BundlerError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The submission attempt timed out.
    ///
    /// The Display text deliberately contains "timed out" so the
    /// troubleshooting classifier picks this up from the message alone.
    #[error("user operation timed out after {0} seconds. The bundler may be experiencing issues or your API key might be incorrect")]
    Timeout(u64),

    /// The operation was accepted but never confirmed in time.
    #[error("user operation not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// The operation landed on-chain but reverted.
    #[error("user operation reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or signing failure.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// Paymaster/sponsorship request failed.
    #[error("paymaster error: {0}")]
    Paymaster(String),

    /// A transaction the pipeline expected to exist was not found.
    #[error("transaction {0} not found")]
    TransactionNotFound(TxHash),
}

/// Result type for bundler operations.
pub type BundlerResult<T> = Result<T, BundlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(11_155_111u64);
        assert_eq!(chain_id.0, 11_155_111);
        assert_eq!(u64::from(chain_id), 11_155_111);
    }

    #[test]
    fn test_bare_call_request() {
        let target: Address = "0x9D3c19e01FBF90a7883396B5BBc5dbF7a1142531"
            .parse()
            .unwrap();
        let req = UserOperationRequest::bare_call(target);
        assert_eq!(req.target, target);
        assert_eq!(req.value, U256::ZERO);
        assert!(req.data.is_empty());
    }

    #[test]
    fn test_timeout_error_mentions_timed_out() {
        // The troubleshooting classifier matches on message content, so
        // this wording is part of the contract.
        let err = BundlerError::Timeout(60);
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_user_op_hash_display() {
        let hash = UserOperationHash(B256::ZERO);
        assert!(hash.to_string().starts_with("0x"));
    }
}
