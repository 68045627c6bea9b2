//! Structured logging via the `tracing` ecosystem.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "info";

/// Builds the filter: `RUST_LOG` wins, then `level`, then [`DEFAULT_FILTER`].
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(DEFAULT_FILTER)))
}

/// Installs the global subscriber: console output with uptime timestamps and
/// module paths. Calling it twice is harmless; the second call is ignored.
pub fn init_logging(level: Option<&str>) {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console_layer)
        .try_init();
}
