//! Upgrade pipeline: one configurable sequence replacing what used to
//! be three near-identical entry points.
//!
//! # Data Flow
//! ```text
//! UserOperationRequest
//!     → submit   (runner: deadline race, outcome classification)
//!     → confirm  (poll bundler until the operation is mined)
//!     → [verify sponsorship]  (optional: who paid gas?)
//!     → [scan event]          (optional: decode counter event)
//!     → UpgradeReport
//! ```
//!
//! Optional stages are toggled by configuration, not by separate
//! binaries; each consumes only the confirmed transaction hash.

pub mod upgrade;

pub use upgrade::{UpgradePipeline, UpgradeReport};
