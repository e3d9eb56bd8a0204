//! Logging utilities for the skystrip daemon.
//!
//! Structured tracing setup; `RUST_LOG` always wins over the configured
//! level so a deployment can be inspected without touching its config.

use tracing::error;

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Log an error with context
pub fn log_error(error: &crate::error::SkystripError, context: &str) {
    error!(
        error = %error,
        context = context,
        "Error occurred"
    );
}
