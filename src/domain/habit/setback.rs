//! Setback Detector - flags active habits that have silently lapsed.
//!
//! Detection is pure and read-only. Running a pass twice without an
//! intervening completion yields the same classification; deduplicating
//! alerts across passes is left to whoever consumes the events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{HabitId, Percentage, SetbackId, Timestamp, UserId};

use super::{Cadence, Habit};

/// Grace multiple of the expected interval before a lapse counts.
pub const GRACE_MULTIPLE: u64 = 2;

/// Multiple above which a lapse is moderate and treated as low motivation.
pub const MODERATE_MULTIPLE: u64 = 4;

/// Multiple above which a lapse is major.
pub const MAJOR_MULTIPLE: u64 = 7;

/// Secondary signal for the recovery planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetbackKind {
    /// A few occurrences were missed.
    MissedDays,
    /// Sustained silence.
    LowMotivation,
}

impl fmt::Display for SetbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetbackKind::MissedDays => write!(f, "missed_days"),
            SetbackKind::LowMotivation => write!(f, "low_motivation"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetbackSeverity {
    Minor,
    Moderate,
    Major,
}

impl fmt::Display for SetbackSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetbackSeverity::Minor => write!(f, "minor"),
            SetbackSeverity::Moderate => write!(f, "moderate"),
            SetbackSeverity::Major => write!(f, "major"),
        }
    }
}

/// Habit state captured at detection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetbackContext {
    /// Whole days since the last completion; `None` if never completed.
    pub days_since_last: Option<u32>,
    /// Streak that will be lost if the habit is not resumed in time.
    pub streak_lost: u32,
    pub success_rate: Percentage,
}

/// A detected lapse. Ephemeral; at most one per habit per pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetbackEvent {
    pub id: SetbackId,
    pub habit_id: HabitId,
    pub owner_id: UserId,
    pub kind: SetbackKind,
    pub severity: SetbackSeverity,
    pub detected_at: Timestamp,
    pub context: SetbackContext,
}

/// Stateless detector.
pub struct SetbackDetector;

impl SetbackDetector {
    /// Classifies a lapse of `days_since_last` days, or `None` within grace.
    ///
    /// `u64::MAX` stands for a habit that was never completed.
    pub fn classify(days_since_last: u64, cadence: Cadence) -> Option<(SetbackKind, SetbackSeverity)> {
        let expected = u64::from(cadence.expected_interval_days());

        if days_since_last <= expected.saturating_mul(GRACE_MULTIPLE) {
            return None;
        }

        let severity = if days_since_last > expected.saturating_mul(MAJOR_MULTIPLE) {
            SetbackSeverity::Major
        } else if days_since_last > expected.saturating_mul(MODERATE_MULTIPLE) {
            SetbackSeverity::Moderate
        } else {
            SetbackSeverity::Minor
        };

        let kind = if days_since_last > expected.saturating_mul(MODERATE_MULTIPLE) {
            SetbackKind::LowMotivation
        } else {
            SetbackKind::MissedDays
        };

        Some((kind, severity))
    }

    /// Checks a single habit. Paused and retired habits are never flagged.
    pub fn detect(habit: &Habit, now: &Timestamp) -> Option<SetbackEvent> {
        if !habit.status().accepts_completions() {
            return None;
        }

        let days_since_last = habit
            .last_completion()
            .map(|c| now.whole_days_since(c.completed_at()));
        let (kind, severity) = Self::classify(
            days_since_last.map(u64::from).unwrap_or(u64::MAX),
            habit.cadence(),
        )?;

        Some(SetbackEvent {
            id: SetbackId::new(),
            habit_id: *habit.id(),
            owner_id: habit.owner_id().clone(),
            kind,
            severity,
            detected_at: *now,
            context: SetbackContext {
                days_since_last,
                streak_lost: habit.metrics().current_streak,
                success_rate: habit.metrics().success_rate,
            },
        })
    }

    /// Runs one detection pass. Output follows the input order.
    pub fn scan<'a, I>(habits: I, now: &Timestamp) -> Vec<SetbackEvent>
    where
        I: IntoIterator<Item = &'a Habit>,
    {
        habits
            .into_iter()
            .filter_map(|habit| Self::detect(habit, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::habit::{HabitCompletion, HabitDefinition, HabitStatus, QualityScore};
    use chrono::{TimeZone, Utc};

    fn day(n: i64) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()).plus_days(n)
    }

    fn habit_completed_on(cadence: Cadence, days: &[i64]) -> Habit {
        let owner = UserId::new("owner").unwrap();
        let mut habit = Habit::new(owner, HabitDefinition::new("Journal", cadence), day(0)).unwrap();
        for d in days {
            let completion =
                HabitCompletion::new(day(*d), QualityScore::try_new(6).unwrap(), None).unwrap();
            habit = habit.apply_completion(completion, &day(*d)).unwrap().habit;
        }
        habit
    }

    #[test]
    fn daily_ten_days_is_major_low_motivation() {
        assert_eq!(
            SetbackDetector::classify(10, Cadence::Daily),
            Some((SetbackKind::LowMotivation, SetbackSeverity::Major))
        );
    }

    #[test]
    fn within_grace_is_not_a_setback() {
        assert_eq!(SetbackDetector::classify(2, Cadence::Daily), None);
        assert_eq!(SetbackDetector::classify(14, Cadence::Weekly), None);
    }

    #[test]
    fn severity_bands_follow_multiples() {
        assert_eq!(
            SetbackDetector::classify(3, Cadence::Daily),
            Some((SetbackKind::MissedDays, SetbackSeverity::Minor))
        );
        assert_eq!(
            SetbackDetector::classify(4, Cadence::Daily),
            Some((SetbackKind::MissedDays, SetbackSeverity::Minor))
        );
        assert_eq!(
            SetbackDetector::classify(5, Cadence::Daily),
            Some((SetbackKind::LowMotivation, SetbackSeverity::Moderate))
        );
        assert_eq!(
            SetbackDetector::classify(7, Cadence::Daily),
            Some((SetbackKind::LowMotivation, SetbackSeverity::Moderate))
        );
        assert_eq!(
            SetbackDetector::classify(50, Cadence::Weekly),
            Some((SetbackKind::LowMotivation, SetbackSeverity::Major))
        );
    }

    #[test]
    fn never_completed_habit_is_major() {
        let habit = habit_completed_on(Cadence::Monthly, &[]);
        let event = SetbackDetector::detect(&habit, &day(0)).unwrap();
        assert_eq!(event.severity, SetbackSeverity::Major);
        assert_eq!(event.kind, SetbackKind::LowMotivation);
        assert_eq!(event.context.days_since_last, None);
    }

    #[test]
    fn detect_captures_context() {
        let habit = habit_completed_on(Cadence::Daily, &[0, 1, 2]);
        let event = SetbackDetector::detect(&habit, &day(12)).unwrap();
        assert_eq!(event.habit_id, *habit.id());
        assert_eq!(event.context.days_since_last, Some(10));
        assert_eq!(event.context.streak_lost, 3);
        assert_eq!(event.severity, SetbackSeverity::Major);
    }

    #[test]
    fn paused_and_retired_habits_are_skipped() {
        let habit = habit_completed_on(Cadence::Daily, &[0]);
        let paused = habit.change_status(HabitStatus::Paused, &day(1)).unwrap();
        let retired = habit.change_status(HabitStatus::Retired, &day(1)).unwrap();
        assert!(SetbackDetector::scan([&paused, &retired], &day(30)).is_empty());
    }

    #[test]
    fn scan_keeps_input_order_and_one_event_per_habit() {
        let lapsed_a = habit_completed_on(Cadence::Daily, &[0]);
        let fine = habit_completed_on(Cadence::Daily, &[9]);
        let lapsed_b = habit_completed_on(Cadence::Daily, &[1]);
        let habits = vec![lapsed_a.clone(), fine, lapsed_b.clone()];

        let events = SetbackDetector::scan(&habits, &day(10));
        let ids: Vec<_> = events.iter().map(|e| e.habit_id).collect();
        assert_eq!(ids, vec![*lapsed_a.id(), *lapsed_b.id()]);
    }

    #[test]
    fn repeated_scans_classify_identically() {
        let habits = vec![
            habit_completed_on(Cadence::Daily, &[0]),
            habit_completed_on(Cadence::Biweekly, &[0]),
        ];
        let classify = |events: Vec<SetbackEvent>| {
            events
                .into_iter()
                .map(|e| (e.habit_id, e.kind, e.severity, e.context))
                .collect::<Vec<_>>()
        };
        let first = classify(SetbackDetector::scan(&habits, &day(40)));
        let second = classify(SetbackDetector::scan(&habits, &day(40)));
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
