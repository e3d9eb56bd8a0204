//! Error types for the skystrip application.
//!
//! This module defines a single error enum that covers all failure
//! conditions in the daemon, from forecast fetching to LED hardware setup.

use thiserror::Error;

/// The main error type for skystrip operations.
#[derive(Error, Debug)]
pub enum SkystripError {
    /// HTTP errors from the forecast API client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors (SPI device, GPIO sysfs, config file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Ramp builder configuration errors
    #[error("Invalid ramp configuration: {message}")]
    InvalidConfig { message: String },

    /// Too few forecast samples for the configured window
    #[error("Insufficient forecast data: need at least {needed} samples, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Forecast API returned an unusable response
    #[error("Forecast API error: {message}")]
    Api { message: String },

    /// LED strip setup or transfer errors
    #[error("LED strip error: {message}")]
    Led { message: String },

    /// GPIO selector errors
    #[error("GPIO error: {message}")]
    Gpio { message: String },
}

/// Convenience type alias for Results with SkystripError
pub type Result<T> = std::result::Result<T, SkystripError>;
