//! Habit completion event and its self-reported quality score.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{CompletionId, Timestamp, ValidationError};

/// Maximum length for a completion reflection.
pub const MAX_REFLECTION_LENGTH: usize = 2000;

/// Self-reported quality of a repetition, 0 (poor) to 10 (excellent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QualityScore(u8);

impl QualityScore {
    pub const MAX: u8 = 10;

    /// Creates a QualityScore, returning error if above 10.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > Self::MAX {
            return Err(ValidationError::out_of_range(
                "quality",
                0,
                i32::from(Self::MAX),
                i32::from(value),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Reward multiplier in `[0.0, 1.0]`.
    pub fn multiplier(&self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX)
    }
}

impl TryFrom<u8> for QualityScore {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<QualityScore> for u8 {
    fn from(score: QualityScore) -> Self {
        score.0
    }
}

impl fmt::Display for QualityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

/// One immutable repetition of a habit.
///
/// Appended to exactly one habit's history and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitCompletion {
    id: CompletionId,
    completed_at: Timestamp,
    quality: QualityScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reflection: Option<String>,
}

impl HabitCompletion {
    /// Creates a completion. Blank reflections are dropped.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if the reflection is longer than 2000 characters
    pub fn new(
        completed_at: Timestamp,
        quality: QualityScore,
        reflection: Option<String>,
    ) -> Result<Self, ValidationError> {
        let reflection = reflection
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        if let Some(text) = &reflection {
            let len = text.chars().count();
            if len > MAX_REFLECTION_LENGTH {
                return Err(ValidationError::out_of_range(
                    "reflection",
                    0,
                    MAX_REFLECTION_LENGTH as i32,
                    len as i32,
                ));
            }
        }

        Ok(Self {
            id: CompletionId::new(),
            completed_at,
            quality,
            reflection,
        })
    }

    pub fn id(&self) -> &CompletionId {
        &self.id
    }

    pub fn completed_at(&self) -> &Timestamp {
        &self.completed_at
    }

    pub fn quality(&self) -> QualityScore {
        self.quality
    }

    pub fn reflection(&self) -> Option<&str> {
        self.reflection.as_deref()
    }
}
