//! Tracing subscriber setup

use crate::config::TestkitConfiguration;
use tracing_subscriber::EnvFilter;

/// Install a formatted tracing subscriber for test output
///
/// `RUST_LOG` takes precedence over `level`. Calling this more than once is
/// harmless; later calls leave the first subscriber in place.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Initialise logging at the settings' `log_level`
pub fn init_from_settings(settings: &TestkitConfiguration) {
    init_logging(&settings.log_level);
}

/// Same as [`init_logging`], emitting one JSON object per event
pub fn init_json_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
