//! Bundler integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key, API key)
//!     → wallet.rs (key loading, hash/authorization signing)
//!     → client.rs (bundler + node RPC with timeouts)
//!     → user_op.rs (ERC-4337 v0.7 wire format and hashing)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or API keys
//! - All RPC calls have a per-request timeout
//!
//! Everything the external account-abstraction stack does (authorization
//! construction, gas estimation, paymaster data, inclusion polling) is
//! reached through [`BundlerClient`]; the rest of the crate only sees
//! `submit` and `wait_for_transaction`.

pub mod client;
pub mod types;
pub mod user_op;
pub mod wallet;

pub use client::BundlerClient;
pub use types::{BundlerError, BundlerResult, ChainId, UserOperationHash, UserOperationRequest};
pub use wallet::Wallet;
