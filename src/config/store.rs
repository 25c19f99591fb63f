//! Habit store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// File store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Root directory holding one sub-directory per owner
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyDataDir);
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/habits")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data/habits"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_data_dir_is_invalid() {
        let config = StoreConfig {
            data_dir: PathBuf::new(),
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptyDataDir));
    }
}
