//! Reward Calculator - experience points for a single completion.

use super::{DifficultyTier, QualityScore};

/// Streak bonus added per consecutive repetition.
pub const STREAK_BONUS_PER_REPETITION: f64 = 0.1;

/// Upper bound of the streak multiplier.
pub const MAX_STREAK_MULTIPLIER: f64 = 3.0;

/// Ledger event type used when forwarding completion XP.
pub const COMPLETION_AWARD_EVENT: &str = "habit_completion";

/// Calculator for completion rewards.
pub struct RewardCalculator;

impl RewardCalculator {
    /// `min(1 + 0.1 * streak, 3)`.
    pub fn streak_multiplier(current_streak: u32) -> f64 {
        (1.0 + STREAK_BONUS_PER_REPETITION * f64::from(current_streak)).min(MAX_STREAK_MULTIPLIER)
    }

    /// `round(base_xp * streak_multiplier * quality / 10)`.
    ///
    /// `current_streak` is the streak after the completion was applied.
    pub fn completion_xp(
        difficulty: DifficultyTier,
        current_streak: u32,
        quality: QualityScore,
    ) -> u32 {
        let xp = f64::from(difficulty.base_xp())
            * Self::streak_multiplier(current_streak)
            * quality.multiplier();
        xp.round() as u32
    }
}
