//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid timeout for {0}: must be greater than zero")]
    InvalidTimeout(&'static str),

    #[error("Invalid max_tokens: must be greater than zero")]
    InvalidMaxTokens,

    #[error("Invalid max_retries: must be at most {0}")]
    InvalidMaxRetries(u32),

    #[error("Invalid temperature: must be between 0 and 2")]
    InvalidTemperature,

    #[error("Invalid histogram bin count: must be between 1 and 500")]
    InvalidHistogramBins,

    #[error("Invalid profile sample size: must be greater than zero")]
    InvalidSampleSize,

    #[error("Invalid log level directive: {0}")]
    InvalidLogLevel(String),

    #[error("Period {0} has an empty location")]
    EmptyPeriodLocation(&'static str),
}
