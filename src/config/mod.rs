//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `HABIT_ENGINE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use habit_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Scanning every {:?}", config.engine.scan_interval());
//! ```

mod coaching;
mod engine;
mod error;
mod store;
mod telemetry;

pub use coaching::CoachingConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use store::StoreConfig;
pub use telemetry::{LogFormat, TelemetryConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// offline setup. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Engine behavior (analysis interval, thresholds, scan interval)
    #[serde(default)]
    pub engine: EngineConfig,

    /// Habit store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Coaching service connection
    #[serde(default)]
    pub coaching: CoachingConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HABIT_ENGINE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `HABIT_ENGINE__ENGINE__ANALYSIS_INTERVAL=7` -> `engine.analysis_interval = 7`
    /// - `HABIT_ENGINE__STORE__DATA_DIR=/var/lib/habits` -> `store.data_dir = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HABIT_ENGINE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.store.validate()?;
        self.coaching.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
