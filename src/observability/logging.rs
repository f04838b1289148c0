//! Structured logging initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Called once at startup, before configuration loading so that even
/// fatal configuration errors are reported through the same channel.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eoa_upgrader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
