//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines [`Timestamp`], a UTC-only timestamp truncated to seconds
//! precision. Event logs (vote comments, access history, payment records)
//! order by these timestamps, so every producer uses the same clock
//! discipline: UTC, no sub-second components.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating
    /// sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Access the underlying `DateTime<Utc>`.
    pub fn as_utc(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_utc().nanosecond(), 0);
    }

    #[test]
    fn from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
            + chrono::Duration::nanoseconds(987_654_321);
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.as_utc().nanosecond(), 0);
    }

    #[test]
    fn display_is_iso8601_z() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(Timestamp::from_utc(dt).to_string(), "2025-03-14T09:26:53Z");
    }

    #[test]
    fn ordering_follows_instant() {
        let early = Timestamp::from_utc(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let late = Timestamp::from_utc(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 1).unwrap());
        assert!(early < late);
    }
}
