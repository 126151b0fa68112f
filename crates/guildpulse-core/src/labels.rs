//! Fixed-locale timestamp formatting for chart axes and the status bar.

use chrono::{DateTime, Utc};

/// Chart axis label: `"Jan 1, 14:05"`.
///
/// One fixed format regardless of host locale — chrono's English month
/// abbreviations match what the collector's own dashboard shows.
pub fn axis_label(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d, %H:%M").to_string()
}

/// Status bar clock: `"14:05"`.
pub fn clock_label(ts: DateTime<Utc>) -> String {
    ts.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid timestamp")
    }

    #[test]
    fn axis_label_has_no_zero_padded_day() {
        assert_eq!(axis_label(ts("2024-03-05T09:07:00Z")), "Mar 5, 09:07");
    }

    #[test]
    fn axis_label_double_digit_day() {
        assert_eq!(axis_label(ts("2024-12-25T23:59:00Z")), "Dec 25, 23:59");
    }

    #[test]
    fn clock_label_is_hours_minutes() {
        assert_eq!(clock_label(ts("2024-01-01T00:30:59Z")), "00:30");
    }
}
