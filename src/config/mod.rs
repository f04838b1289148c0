//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (ALCHEMY_API_KEY, TARGET_ADDRESS, ...)
//!     → loader.rs (read & parse)
//!     → UpgraderConfig (validated, immutable)
//!     → CLI flags applied on top in main
//! ```
//!
//! # Design Decisions
//! - Configuration is read once at startup; there is no reload path
//! - Required values missing from the environment abort the process
//!   before any network activity, with guidance on where to get them
//! - The API key is never printed; `UpgraderConfig`'s Debug impl
//!   redacts it

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::UpgraderConfig;
