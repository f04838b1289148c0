//! Receipt event scanning.
//!
//! # Data Flow
//! ```text
//! confirmed transaction receipt (logs)
//!     → scanner.rs (filter by emitting address, decode one event shape)
//!     → Option<decoded value>
//! ```
//!
//! # Design Decisions
//! - A log that fails to decode is skipped, not an error
//! - "No event found" is a valid outcome, not a failure

pub mod scanner;

pub use scanner::{scan_for_counter_event, CounterIncremented};
