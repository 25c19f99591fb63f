//! HabitStatus enum for tracking the lifecycle of a habit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a habit.
///
/// Retiring is a soft delete and is only ever done by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    #[default]
    Active,
    Paused,
    Retired,
}

impl HabitStatus {
    /// Returns true if completions may be recorded.
    pub fn accepts_completions(&self) -> bool {
        matches!(self, HabitStatus::Active)
    }

    /// Returns true if the definition may still be edited.
    pub fn is_mutable(&self) -> bool {
        !matches!(self, HabitStatus::Retired)
    }
}

impl StateMachine for HabitStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use HabitStatus::*;
        matches!(
            (self, target),
            (Active, Paused) | (Paused, Active) | (Active, Retired) | (Paused, Retired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use HabitStatus::*;
        match self {
            Active => vec![Paused, Retired],
            Paused => vec![Active, Retired],
            Retired => vec![],
        }
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HabitStatus::Active => "active",
            HabitStatus::Paused => "paused",
            HabitStatus::Retired => "retired",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(HabitStatus::default(), HabitStatus::Active);
    }

    #[test]
    fn only_active_accepts_completions() {
        assert!(HabitStatus::Active.accepts_completions());
        assert!(!HabitStatus::Paused.accepts_completions());
        assert!(!HabitStatus::Retired.accepts_completions());
    }

    #[test]
    fn pause_and_resume_are_reversible() {
        let paused = HabitStatus::Active.transition_to(HabitStatus::Paused).unwrap();
        assert_eq!(paused.transition_to(HabitStatus::Active), Ok(HabitStatus::Active));
    }

    #[test]
    fn retired_is_terminal() {
        assert!(HabitStatus::Retired.is_terminal());
        assert!(HabitStatus::Retired.transition_to(HabitStatus::Active).is_err());
        assert!(!HabitStatus::Retired.is_mutable());
    }

    #[test]
    fn transitions_agree_with_valid_transitions() {
        for from in [HabitStatus::Active, HabitStatus::Paused, HabitStatus::Retired] {
            for to in from.valid_transitions() {
                assert!(from.can_transition_to(&to));
            }
        }
    }
}
