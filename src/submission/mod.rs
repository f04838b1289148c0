//! Submission subsystem: the deadline-guarded operation runner and
//! failure troubleshooting.
//!
//! # Data Flow
//! ```text
//! UserOperationRequest
//!     → runner.rs (race submission future vs. deadline)
//!     → SubmissionOutcome {Success, TimedOut, Failed}
//!     → troubleshoot.rs (classify failure text → remediation lines)
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per invocation; callers wanting retries call
//!   the runner again
//! - Losing the race drops the in-flight future; cancellation is
//!   best-effort only (see runner.rs)
//! - Classification is an ordered pattern table, not nested ifs, so
//!   precedence is visible and testable

pub mod runner;
pub mod troubleshoot;

pub use runner::{OperationRunner, SubmissionOutcome};
pub use troubleshoot::{classify_failure, remediation, FailureKind};
