//! Time-range window selection and filtering.
//!
//! The range only affects what is rendered. Stored series are never filtered
//! in place — every render evaluates the window fresh against a snapshot.

use chrono::{DateTime, Duration, Utc};

use guildpulse_api::{MemberSample, MessageSample};

/// A type with a sample timestamp, filterable by [`filter_by_range`].
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for MemberSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for MessageSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// The user-selected display window: everything, or the trailing N hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    All,
    Hours(u32),
}

impl TimeRange {
    /// The cutoff instant for this range, given the current time.
    /// `All` has no cutoff.
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Hours(h) => Some(now - Duration::hours(i64::from(h))),
        }
    }
}

/// Return the samples visible under `range` at instant `now`.
///
/// `All` returns the slice unchanged (same elements, same order). For an
/// hour window, a sample exactly at the cutoff is included. Pure: the input
/// is never mutated, and relative order is preserved.
pub fn filter_by_range<T: Timestamped>(
    series: &[T],
    range: TimeRange,
    now: DateTime<Utc>,
) -> &[T] {
    let Some(cutoff) = range.cutoff(now) else {
        return series;
    };
    // Series are stored sorted ascending, so the window is a suffix.
    let start = series.partition_point(|s| s.timestamp() < cutoff);
    &series[start..]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn member(ts: &str) -> MemberSample {
        MemberSample {
            timestamp: ts.parse().expect("valid timestamp"),
            total_members: 0,
            online_members: 0,
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-01-01T02:00:00Z".parse().expect("valid timestamp")
    }

    #[test]
    fn all_returns_series_unchanged() {
        let series = vec![member("2020-01-01T00:00:00Z"), member("2024-01-01T01:00:00Z")];
        let filtered = filter_by_range(&series, TimeRange::All, now());
        assert_eq!(filtered, &series[..]);
    }

    #[test]
    fn hour_window_excludes_old_and_keeps_recent() {
        // now = 02:00, window = 1h → cutoff = 01:00
        let series = vec![
            member("2024-01-01T00:30:00Z"), // excluded
            member("2024-01-01T01:30:00Z"), // included
        ];
        let filtered = filter_by_range(&series, TimeRange::Hours(1), now());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].timestamp, series[1].timestamp);
    }

    #[test]
    fn sample_exactly_at_cutoff_is_included() {
        let series = vec![member("2024-01-01T01:00:00Z")];
        let filtered = filter_by_range(&series, TimeRange::Hours(1), now());
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn empty_series_stays_empty() {
        let series: Vec<MemberSample> = Vec::new();
        assert!(filter_by_range(&series, TimeRange::Hours(24), now()).is_empty());
        assert!(filter_by_range(&series, TimeRange::All, now()).is_empty());
    }
}
