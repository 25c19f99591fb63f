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

    #[error("Scan interval must be between 1 second and 1 day")]
    InvalidScanInterval,

    #[error("Default streak threshold must be at least 1")]
    InvalidStreakThreshold,

    #[error("Default success rate threshold must be between 0 and 100")]
    InvalidSuccessRateThreshold,

    #[error("Data directory must not be empty")]
    EmptyDataDir,

    #[error("Invalid coaching service URL format")]
    InvalidCoachingUrl,

    #[error("Invalid coaching request timeout")]
    InvalidTimeout,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
