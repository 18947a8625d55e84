//! Global tracing subscriber setup for engine binaries.
//!
//! The first call installs the subscriber; later calls are ignored.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::LoggingSettings;

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` is the default verbosity.
/// With `json`, log lines are newline-delimited JSON.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    if installed.is_ok() {
        tracing::debug!(json, level = %level, "tracing initialised");
    }
}

/// Initialise tracing from `[logging]` settings, letting CLI flags force
/// JSON output or a more verbose level.
pub fn init_from_settings(settings: &LoggingSettings, force_json: bool, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        settings.level()
    };
    init_tracing(settings.json || force_json, level);
}
