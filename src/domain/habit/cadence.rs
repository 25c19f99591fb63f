//! Cadence value object and the frequency resolver.
//!
//! The expected interval is the single definition of "on time" shared by the
//! streak calculator and the setback detector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a cadence string is not one of the supported values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized cadence '{0}' (expected daily, weekly, biweekly or monthly)")]
pub struct InvalidCadence(pub String);

/// Declared recurrence frequency of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl Cadence {
    /// All supported cadences, shortest interval first.
    pub const ALL: [Cadence; 4] = [
        Cadence::Daily,
        Cadence::Weekly,
        Cadence::Biweekly,
        Cadence::Monthly,
    ];

    /// Number of days after which a repetition is due.
    pub fn expected_interval_days(&self) -> u32 {
        match self {
            Cadence::Daily => 1,
            Cadence::Weekly => 7,
            Cadence::Biweekly => 14,
            Cadence::Monthly => 30,
        }
    }

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Biweekly => "biweekly",
            Cadence::Monthly => "monthly",
        }
    }
}

impl FromStr for Cadence {
    type Err = InvalidCadence;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Cadence::Daily),
            "weekly" => Ok(Cadence::Weekly),
            "biweekly" => Ok(Cadence::Biweekly),
            "monthly" => Ok(Cadence::Monthly),
            _ => Err(InvalidCadence(s.to_string())),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a raw cadence value to its expected interval in days.
///
/// # Errors
///
/// - `InvalidCadence` for anything outside daily/weekly/biweekly/monthly
pub fn resolve_interval_days(raw: &str) -> Result<u32, InvalidCadence> {
    raw.parse::<Cadence>().map(|c| c.expected_interval_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn resolves_fixed_intervals() {
        assert_eq!(resolve_interval_days("daily"), Ok(1));
        assert_eq!(resolve_interval_days("weekly"), Ok(7));
        assert_eq!(resolve_interval_days("biweekly"), Ok(14));
        assert_eq!(resolve_interval_days("monthly"), Ok(30));
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(" Weekly ".parse::<Cadence>(), Ok(Cadence::Weekly));
        assert_eq!("DAILY".parse::<Cadence>(), Ok(Cadence::Daily));
    }

    #[test]
    fn unknown_cadence_is_rejected_not_defaulted() {
        assert_eq!(
            resolve_interval_days("fortnightly"),
            Err(InvalidCadence("fortnightly".to_string()))
        );
        assert!(resolve_interval_days("").is_err());
    }

    #[test]
    fn every_cadence_has_positive_interval() {
        for cadence in Cadence::ALL {
            assert!(cadence.expected_interval_days() > 0);
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        for cadence in Cadence::ALL {
            assert_eq!(cadence.to_string().parse::<Cadence>(), Ok(cadence));
        }
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Cadence::Biweekly).unwrap(), "\"biweekly\"");
    }

    proptest! {
        #[test]
        fn resolver_accepts_only_the_four_cadences(raw in "[a-zA-Z]{0,12}") {
            let known = ["daily", "weekly", "biweekly", "monthly"];
            let result = resolve_interval_days(&raw);
            if known.contains(&raw.to_ascii_lowercase().as_str()) {
                prop_assert!(result.map(|d| d > 0).unwrap_or(false));
            } else {
                prop_assert_eq!(result, Err(InvalidCadence(raw.clone())));
            }
        }
    }
}
