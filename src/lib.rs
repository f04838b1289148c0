//! EOA → Smart Account Upgrade Tool (EIP-7702)
//!
//! Upgrades an externally-owned account to a smart account by submitting
//! an ERC-4337 user operation carrying an EIP-7702 authorization to a
//! bundler endpoint, then walks the resulting transaction through a set
//! of optional post-confirmation stages.
//!
//! # Architecture Overview
//!
//! ```text
//!   Environment (API key, private key, target, policy id)
//!       │
//!       ▼
//!   ┌─────────┐     ┌──────────┐     ┌────────────┐
//!   │ config  │────▶│ bundler  │────▶│ submission │   submit vs. deadline race
//!   │ loader  │     │ client   │     │ runner     │──▶ Success / TimedOut / Failed
//!   └─────────┘     └──────────┘     └────────────┘
//!                        │                 │
//!                        ▼                 ▼
//!                   ┌──────────┐     ┌─────────────┐
//!                   │ confirm  │────▶│ post stages │   [verify sponsorship]
//!                   │ (poll)   │     │ (pipeline)  │   [scan counter event]
//!                   └──────────┘     └─────────────┘
//! ```
//!
//! All signing, bundling and paymaster logic is reached only through the
//! `bundler` subsystem; everything above it is plain control flow.

// Core subsystems
pub mod bundler;
pub mod config;
pub mod events;
pub mod pipeline;
pub mod submission;

// Cross-cutting concerns
pub mod observability;

pub use bundler::{BundlerClient, BundlerError, Wallet};
pub use config::UpgraderConfig;
pub use pipeline::UpgradePipeline;
pub use submission::{OperationRunner, SubmissionOutcome};
