//! Tracing bootstrap

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Settings;

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

/// Like `init`, but emits one JSON object per event (for CI log collectors)
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(filter)
        .try_init();
}

/// Pick the subscriber format from the run settings
pub fn init_from(settings: &Settings) {
    if settings.log_json {
        init_json();
    } else {
        init();
    }
}
