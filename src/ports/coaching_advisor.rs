//! CoachingAdvisor port - progression proposals and pattern analysis.
//!
//! Both requests are one-way. A proposal comes back through the user
//! accepting it; analysis results are consumed elsewhere.

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::habit::{DifficultyTier, HabitContext};

use super::CollaboratorError;

#[async_trait]
pub trait CoachingAdvisor: Send + Sync {
    /// Asks for a concrete next-level variant of the habit at `next_tier`.
    async fn propose_next_level(
        &self,
        owner_id: &UserId,
        habit: &HabitContext,
        next_tier: DifficultyTier,
    ) -> Result<(), CollaboratorError>;

    /// Asks for an analysis of the owner's completion pattern.
    async fn request_pattern_analysis(
        &self,
        owner_id: &UserId,
        habit: &HabitContext,
    ) -> Result<(), CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn CoachingAdvisor) {}
}
