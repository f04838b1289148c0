//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; level configurable with RUST_LOG
//! - Stage narration at info, RPC chatter at debug
//! - Key material and API keys never appear in log fields

pub mod logging;
