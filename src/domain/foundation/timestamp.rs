//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Number of seconds in one day, used for whole-day arithmetic.
const SECONDS_PER_DAY: i64 = 86_400;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Whole days elapsed since `earlier` (floor of the duration).
    ///
    /// Clamped at zero when `earlier` lies in the future.
    pub fn whole_days_since(&self, earlier: &Timestamp) -> u32 {
        let secs = self.duration_since(earlier).num_seconds();
        if secs <= 0 {
            return 0;
        }
        u32::try_from(secs / SECONDS_PER_DAY).unwrap_or(u32::MAX)
    }

    /// Returns true if this timestamp lies in `[reference - days, reference]`.
    pub fn is_within_trailing_days(&self, reference: &Timestamp, days: i64) -> bool {
        let window_start = reference.minus_days(days);
        !self.is_before(&window_start) && !self.is_after(reference)
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Creates a new timestamp by adding the specified number of hours.
    pub fn plus_hours(&self, hours: i64) -> Self {
        Self(self.0 + Duration::hours(hours))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn whole_days_since_floors_partial_days() {
        let start = at(2024, 3, 1, 9);
        assert_eq!(at(2024, 3, 2, 8).whole_days_since(&start), 0);
        assert_eq!(at(2024, 3, 2, 9).whole_days_since(&start), 1);
        assert_eq!(at(2024, 3, 3, 21).whole_days_since(&start), 2);
    }

    #[test]
    fn whole_days_since_clamps_future_reference_to_zero() {
        let now = at(2024, 3, 1, 9);
        assert_eq!(now.whole_days_since(&now.plus_days(3)), 0);
    }

    #[test]
    fn trailing_window_is_inclusive_on_both_ends() {
        let now = at(2024, 6, 30, 12);
        assert!(now.is_within_trailing_days(&now, 30));
        assert!(now.minus_days(30).is_within_trailing_days(&now, 30));
        assert!(!now.minus_days(31).is_within_trailing_days(&now, 30));
        assert!(!now.plus_hours(1).is_within_trailing_days(&now, 30));
    }

    #[test]
    fn plus_and_minus_days_are_inverse() {
        let ts = at(2024, 1, 15, 0);
        assert_eq!(ts.plus_days(10).minus_days(10), ts);
        assert_eq!(ts.plus_days(17).as_datetime().day(), 1);
    }

    #[test]
    fn timestamp_round_trips_through_json() {
        let ts = at(2024, 1, 15, 10);
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-15"));
        let restored: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ts);
    }

    #[test]
    fn timestamp_ordering_works() {
        let earlier = at(2024, 1, 1, 0);
        let later = earlier.plus_hours(1);
        assert!(earlier < later);
        assert!(earlier.is_before(&later));
        assert!(later.is_after(&earlier));
    }
}
