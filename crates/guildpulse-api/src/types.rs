//! Wire types for the two feed documents.
//!
//! The collector publishes timestamps as ISO-8601 strings, with or without a
//! UTC offset (`datetime.utcnow().isoformat()` emits none); chrono parses
//! them at the serde boundary so everything downstream works with
//! `DateTime<Utc>`. The feeds carry no ordering guarantee — sorting is the
//! consumer's job.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One point of the member-count history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberSample {
    /// When the sample was taken.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Total members at sample time.
    pub total_members: u64,
    /// Members online at sample time.
    pub online_members: u64,
}

/// One point of the message-rate history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageSample {
    /// When the sample was taken.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Messages observed in the ten minutes before the sample.
    pub messages_last_10min: u64,
}

/// Parse a feed timestamp. RFC 3339 first; offset-less ISO 8601 strings
/// (the collector's native format) are interpreted as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|_| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_sample_parses_rfc3339() {
        let json = r#"{"timestamp":"2024-01-01T00:00:00Z","total_members":10,"online_members":2}"#;
        let sample: MemberSample = serde_json::from_str(json).expect("valid sample");
        assert_eq!(sample.total_members, 10);
        assert_eq!(sample.online_members, 2);
        assert_eq!(sample.timestamp.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn member_sample_parses_offsetless_timestamp_as_utc() {
        // The collector emits naive ISO 8601 with microseconds.
        let json = r#"{"timestamp":"2024-01-01T00:00:00.123456","total_members":10,"online_members":2}"#;
        let sample: MemberSample = serde_json::from_str(json).expect("valid sample");
        assert_eq!(
            sample.timestamp.to_rfc3339(),
            "2024-01-01T00:00:00.123456+00:00"
        );
    }

    #[test]
    fn message_sample_parses_offsetless_timestamp() {
        let json = r#"{"timestamp":"2024-06-15T12:30:00","messages_last_10min":5}"#;
        let sample: MessageSample = serde_json::from_str(json).expect("valid sample");
        assert_eq!(sample.timestamp.to_rfc3339(), "2024-06-15T12:30:00+00:00");
    }

    #[test]
    fn message_sample_rejects_bad_timestamp() {
        let json = r#"{"timestamp":"yesterday","messages_last_10min":5}"#;
        assert!(serde_json::from_str::<MessageSample>(json).is_err());
    }
}
