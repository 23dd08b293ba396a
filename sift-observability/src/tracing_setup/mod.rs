//! Tracing setup: structured logging with span definitions and event functions.

pub mod events;
pub mod spans;

use std::sync::Once;

use sift_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize the tracing subscriber with structured JSON output.
///
/// Respects the `SIFT_LOG` environment variable for filtering, defaulting
/// to `info`. Only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("SIFT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter, true);
}

/// Initialize tracing with a custom filter string (for tests or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    install(EnvFilter::new(filter), true);
}

/// Initialize from configuration. `SIFT_LOG` still wins when set.
pub fn init_from_config(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env("SIFT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    install(filter, config.json_logs);
}

fn install(filter: EnvFilter, json: bool) {
    INIT.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true);
        // Another subscriber may already be installed by the host.
        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}
