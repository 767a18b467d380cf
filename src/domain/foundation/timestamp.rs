//! Points in time carried by events, publications and announcements.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// UTC instant, serialized as RFC 3339.
///
/// Ordering is chronological, which the board ranking relies on for
/// newest-first sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Negative values move backwards.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// Calendar day in UTC, used by the publishing-date search filter.
    pub fn utc_date(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let ts: Timestamp = serde_json::from_str("\"2024-05-20T18:00:00+02:00\"").unwrap();

        assert_eq!(ts, at("2024-05-20T16:00:00Z"));
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-05-20T16:00:00Z\"");
    }

    #[test]
    fn utc_date_normalizes_offsets() {
        let late_evening_in_new_york = at("2024-03-02T23:30:00-05:00");

        assert_eq!(
            late_evening_in_new_york.utc_date(),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
        );
    }

    #[test]
    fn arithmetic_preserves_ordering() {
        let base = at("2024-01-31T08:00:00Z");

        assert!(base.plus_minutes(1) > base);
        assert!(base.add_days(-1) < base);
        assert_eq!(
            base.add_days(1).utc_date(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }
}
