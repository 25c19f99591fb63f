//! Coaching service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::CoachingClientConfig;

use super::error::ValidationError;

/// Coaching service configuration
///
/// Without a `base_url` the engine runs against the in-memory coaching
/// service and collaborator requests never leave the process.
#[derive(Debug, Clone, Deserialize)]
pub struct CoachingConfig {
    /// Base URL of the coaching service
    pub base_url: Option<String>,

    /// Bearer token for the coaching service
    pub api_key: Option<Secret<String>>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl CoachingConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a remote coaching service is configured
    pub fn is_remote(&self) -> bool {
        self.base_url.as_ref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Client configuration for the HTTP adapter, if a service is configured
    pub fn client_config(&self) -> Option<CoachingClientConfig> {
        if !self.is_remote() {
            return None;
        }
        let base_url = self.base_url.as_deref()?;
        let mut config = CoachingClientConfig::new(base_url.trim()).with_timeout(self.timeout());
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.expose_secret().clone());
        }
        Some(config)
    }

    /// Validate coaching configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            let url = url.trim();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidCoachingUrl);
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for CoachingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coaching_config_defaults() {
        let config = CoachingConfig::default();
        assert!(!config.is_remote());
        assert!(config.client_config().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config_trims_url() {
        let config = CoachingConfig {
            base_url: Some("https://coach.example.com/".to_string()),
            api_key: Some(Secret::new("ck_live_123".to_string())),
            timeout_secs: 5,
        };
        let client = config.client_config().unwrap();
        assert_eq!(client.base_url, "https://coach.example.com");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_non_http_url_is_invalid() {
        let config = CoachingConfig {
            base_url: Some("ftp://coach.example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCoachingUrl));
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let config = CoachingConfig {
            api_key: Some(Secret::new("ck_live_123".to_string())),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("ck_live_123"));
    }
}
