//! Wallet management and signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//!
//! Under EIP-7702 the smart account address IS the EOA address, so the
//! address this wallet reports is also the sender of every user
//! operation the tool submits.

use alloy::eips::eip7702::{Authorization, SignedAuthorization};
use alloy::primitives::{Address, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::bundler::types::{BundlerError, BundlerResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "WALLET_PRIVATE_KEY";

/// Signing wallet for user operations and EIP-7702 authorizations.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Chain ID for EIP-155/EIP-7702 replay protection.
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// Accepts the key with or without a `0x` prefix; both forms occur
    /// in the wild and are normalized here.
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BundlerResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or_else(|| private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BundlerError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Load wallet from the environment.
    ///
    /// Reads `WALLET_PRIVATE_KEY`. Missing key aborts before any network
    /// activity is attempted.
    pub fn from_env(chain_id: u64) -> BundlerResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BundlerError::Wallet(format!(
                "Environment variable {} not set. Export your signing key before running",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key, chain_id)
    }

    /// The EOA address controlling the operation.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign a 32-byte hash (e.g. a user-operation hash).
    pub async fn sign_hash(&self, hash: B256) -> BundlerResult<alloy::signers::Signature> {
        self.signer
            .sign_hash(&hash)
            .await
            .map_err(|e| BundlerError::Wallet(format!("Signing failed: {}", e)))
    }

    /// Sign an EIP-7702 authorization delegating this EOA to `delegate`.
    ///
    /// `nonce` is the EOA's protocol nonce at the time the authorization
    /// is consumed.
    pub async fn sign_authorization(
        &self,
        delegate: Address,
        nonce: u64,
    ) -> BundlerResult<SignedAuthorization> {
        let authorization = Authorization {
            chain_id: U256::from(self.chain_id),
            address: delegate,
            nonce,
        };
        let signature = self
            .signer
            .sign_hash(&authorization.signature_hash())
            .await
            .map_err(|e| BundlerError::Wallet(format!("Authorization signing failed: {}", e)))?;
        Ok(authorization.into_signed(signature))
    }
}
