//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
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

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Whole minutes elapsed from `other` to this timestamp.
    ///
    /// Negative durations clamp to zero; the sub-minute remainder is
    /// discarded by the floor division, never rounded up.
    pub fn whole_minutes_since(&self, other: &Timestamp) -> u64 {
        let secs = self.0.signed_duration_since(other.0).num_seconds();
        if secs <= 0 {
            0
        } else {
            (secs / 60) as u64
        }
    }

    /// Creates a new timestamp by adding the specified number of minutes.
    pub fn plus_minutes(&self, minutes: u64) -> Self {
        Self(self.0 + Duration::minutes(minutes as i64))
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0 + Duration::seconds(secs as i64))
    }

    /// Creates a new timestamp by subtracting the specified number of seconds.
    pub fn minus_secs(&self, secs: u64) -> Self {
        Self(self.0 - Duration::seconds(secs as i64))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_minutes_floors_partial_minutes() {
        let start = Timestamp::now();
        let later = start.plus_secs(179);
        assert_eq!(later.whole_minutes_since(&start), 2);
    }

    #[test]
    fn whole_minutes_clamps_negative_to_zero() {
        let start = Timestamp::now();
        let earlier = start.minus_secs(120);
        assert_eq!(earlier.whole_minutes_since(&start), 0);
    }

    #[test]
    fn plus_minutes_advances_exactly() {
        let start = Timestamp::now();
        let advanced = start.plus_minutes(3);
        assert_eq!(advanced.whole_minutes_since(&start), 3);
        assert_eq!(advanced.duration_since(&start).num_seconds(), 180);
    }

    #[test]
    fn ordering_follows_time() {
        let a = Timestamp::now();
        let b = a.plus_secs(1);
        assert!(a.is_before(&b));
        assert!(!b.is_before(&a));
    }
}
