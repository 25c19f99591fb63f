//! Engine behavior configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::foundation::Percentage;
use crate::domain::habit::{
    ProgressionRule, DEFAULT_STREAK_THRESHOLD, DEFAULT_SUCCESS_RATE_THRESHOLD,
};

use super::error::ValidationError;

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Completions between pattern analysis requests (0 disables them)
    #[serde(default = "default_analysis_interval")]
    pub analysis_interval: u32,

    /// Streak required for promotion on newly created habits
    #[serde(default = "default_streak_threshold")]
    pub default_streak_threshold: u32,

    /// Success rate (percent) required for promotion on newly created habits
    #[serde(default = "default_success_rate_threshold")]
    pub default_success_rate_threshold: u8,

    /// Seconds between setback scans in the worker
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
}

impl EngineConfig {
    /// Get the scan interval as Duration
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    /// Progression rule applied to habits created without explicit thresholds
    pub fn default_progression_rule(&self) -> Result<ProgressionRule, ValidationError> {
        let rate = Percentage::try_new(self.default_success_rate_threshold)
            .map_err(|_| ValidationError::InvalidSuccessRateThreshold)?;
        ProgressionRule::new(self.default_streak_threshold, Some(rate))
            .map_err(|_| ValidationError::InvalidStreakThreshold)
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.scan_interval_secs == 0 || self.scan_interval_secs > 86_400 {
            return Err(ValidationError::InvalidScanInterval);
        }
        self.default_progression_rule()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analysis_interval: default_analysis_interval(),
            default_streak_threshold: default_streak_threshold(),
            default_success_rate_threshold: default_success_rate_threshold(),
            scan_interval_secs: default_scan_interval(),
        }
    }
}

fn default_analysis_interval() -> u32 {
    7
}

fn default_streak_threshold() -> u32 {
    DEFAULT_STREAK_THRESHOLD
}

fn default_success_rate_threshold() -> u8 {
    DEFAULT_SUCCESS_RATE_THRESHOLD
}

fn default_scan_interval() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.analysis_interval, 7);
        assert_eq!(config.scan_interval(), Duration::from_secs(3600));
        assert_eq!(config.default_progression_rule().unwrap(), ProgressionRule::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_streak_threshold_is_invalid() {
        let config = EngineConfig {
            default_streak_threshold: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidStreakThreshold));
    }

    #[test]
    fn test_success_rate_above_hundred_is_invalid() {
        let config = EngineConfig {
            default_success_rate_threshold: 101,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSuccessRateThreshold));
    }

    #[test]
    fn test_scan_interval_bounds() {
        let config = EngineConfig {
            scan_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidScanInterval));
    }
}
