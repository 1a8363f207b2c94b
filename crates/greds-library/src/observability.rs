//! Tracing initialization.

use tracing_subscriber::EnvFilter;

use greds_core::config::ObservabilityConfig;

/// Install the global tracing subscriber.
///
/// `GREDS_LOG` takes any env-filter directive string and overrides the
/// configured level. Idempotent; if a subscriber is already installed the
/// call is a no-op.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env("GREDS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
