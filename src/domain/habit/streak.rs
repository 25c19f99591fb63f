//! Streak and success-rate calculation.
//!
//! Derives the rolling metrics of a habit from its completion history. It
//! does not award XP or decide progression.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, Timestamp};

use super::{Cadence, HabitCompletion};

/// Length of the trailing window used for the success rate, in days.
pub const SUCCESS_WINDOW_DAYS: u32 = 30;

/// Rolling metrics stored on a habit.
///
/// # Invariants
///
/// - `longest_streak >= current_streak`
/// - `success_rate` is within 0-100 (enforced by `Percentage`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitMetrics {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub success_rate: Percentage,
}

/// Stateless calculator for streak continuity and success rate.
pub struct StreakCalculator;

impl StreakCalculator {
    /// Returns true if a gap between completions keeps the streak alive.
    ///
    /// The tolerance is `gap <= expected * 1.5`, computed in integers as
    /// `2 * gap <= 3 * expected`.
    pub fn is_continuous(gap_days: u32, cadence: Cadence) -> bool {
        u64::from(gap_days) * 2 <= u64::from(cadence.expected_interval_days()) * 3
    }

    /// Streak length after `latest` is appended behind `previous`.
    pub fn next_streak(
        current_streak: u32,
        previous: Option<&HabitCompletion>,
        latest: &HabitCompletion,
        cadence: Cadence,
    ) -> u32 {
        match previous {
            None => 1,
            Some(prev) => {
                let gap = latest.completed_at().whole_days_since(prev.completed_at());
                if Self::is_continuous(gap, cadence) {
                    current_streak.saturating_add(1)
                } else {
                    1
                }
            }
        }
    }

    /// Number of repetitions the cadence expects inside the success window.
    pub fn expected_count(cadence: Cadence) -> u32 {
        SUCCESS_WINDOW_DAYS / cadence.expected_interval_days()
    }

    /// Rolling success rate over the trailing 30 days ending at `now`.
    ///
    /// # Edge Cases
    /// - Cadence longer than the window (expected count 0): 100% if any
    ///   completion falls in the window, otherwise 0%
    pub fn success_rate(history: &[HabitCompletion], cadence: Cadence, now: &Timestamp) -> Percentage {
        let actual = history
            .iter()
            .filter(|c| {
                c.completed_at()
                    .is_within_trailing_days(now, i64::from(SUCCESS_WINDOW_DAYS))
            })
            .count();
        let actual = u32::try_from(actual).unwrap_or(u32::MAX);

        match Percentage::from_ratio(actual, Self::expected_count(cadence)) {
            Some(rate) => rate,
            None if actual > 0 => Percentage::HUNDRED,
            None => Percentage::ZERO,
        }
    }

    /// Recomputes the metrics after the last entry of `history` was appended.
    ///
    /// `history` must already contain the new completion as its last element.
    /// An empty history leaves the metrics untouched.
    pub fn apply(
        metrics: HabitMetrics,
        history: &[HabitCompletion],
        cadence: Cadence,
        now: &Timestamp,
    ) -> HabitMetrics {
        let Some((latest, earlier)) = history.split_last() else {
            return metrics;
        };

        let current_streak =
            Self::next_streak(metrics.current_streak, earlier.last(), latest, cadence);

        HabitMetrics {
            current_streak,
            longest_streak: metrics.longest_streak.max(current_streak),
            success_rate: Self::success_rate(history, cadence, now),
        }
    }
}
