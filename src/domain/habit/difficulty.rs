//! Ordered difficulty scale for habits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Difficulty tier of a habit, ordered from easiest to hardest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    #[default]
    Micro,
    Small,
    Medium,
    Large,
    Challenging,
}

impl DifficultyTier {
    /// Base experience points awarded for one completion at this tier.
    pub fn base_xp(&self) -> u32 {
        match self {
            DifficultyTier::Micro => 10,
            DifficultyTier::Small => 15,
            DifficultyTier::Medium => 25,
            DifficultyTier::Large => 40,
            DifficultyTier::Challenging => 60,
        }
    }

    /// The next rung up, or `None` at the top of the scale.
    pub fn next(&self) -> Option<DifficultyTier> {
        match self {
            DifficultyTier::Micro => Some(DifficultyTier::Small),
            DifficultyTier::Small => Some(DifficultyTier::Medium),
            DifficultyTier::Medium => Some(DifficultyTier::Large),
            DifficultyTier::Large => Some(DifficultyTier::Challenging),
            DifficultyTier::Challenging => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Micro => "micro",
            DifficultyTier::Small => "small",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Large => "large",
            DifficultyTier::Challenging => "challenging",
        }
    }
}

impl FromStr for DifficultyTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "micro" => Ok(DifficultyTier::Micro),
            "small" => Ok(DifficultyTier::Small),
            "medium" => Ok(DifficultyTier::Medium),
            "large" => Ok(DifficultyTier::Large),
            "challenging" => Ok(DifficultyTier::Challenging),
            other => Err(ValidationError::invalid_format(
                "difficulty",
                format!("unknown tier '{}'", other),
            )),
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
