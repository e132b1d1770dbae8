// src/types/date.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// When an image was captured, as the imagery provider reports it.
///
/// The Graph API sends epoch milliseconds, older exports carry seconds or ISO strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapturedAt {
    Timestamp(f64),
    Text(String),
}

// Anything above this is taken to be milliseconds rather than seconds.
const MILLIS_THRESHOLD: f64 = 1e12;

impl CapturedAt {
    /// The calendar date as `YYYY-MM-DD` (UTC for timestamps), or `None` when nothing sensible
    /// can be derived.
    pub fn date_string(&self) -> Option<String> {
        match self {
            CapturedAt::Timestamp(value) => {
                // Zero means the provider had no capture time.
                if !value.is_finite() || *value == 0.0 {
                    return None;
                }
                let seconds = if *value > MILLIS_THRESHOLD {
                    value / 1000.0
                } else {
                    *value
                };
                DateTime::from_timestamp(seconds.floor() as i64, 0)
                    .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
            }
            CapturedAt::Text(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return None;
                }
                if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                    return Some(dt.date_naive().format("%Y-%m-%d").to_string());
                }
                if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
                    return Some(dt.date().format("%Y-%m-%d").to_string());
                }
                if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    return Some(date.format("%Y-%m-%d").to_string());
                }
                Some(raw.chars().take(10).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millisecond_timestamp() {
        let at = CapturedAt::Timestamp(1_600_000_000_000.0);
        assert_eq!(at.date_string().as_deref(), Some("2020-09-13"));
    }

    #[test]
    fn test_second_timestamp() {
        let at = CapturedAt::Timestamp(1_600_000_000.0);
        assert_eq!(at.date_string().as_deref(), Some("2020-09-13"));
    }

    #[test]
    fn test_non_finite_timestamp() {
        assert_eq!(CapturedAt::Timestamp(f64::NAN).date_string(), None);
    }

    #[test]
    fn test_zero_timestamp_has_no_date() {
        assert_eq!(CapturedAt::Timestamp(0.0).date_string(), None);
        let at: CapturedAt = serde_json::from_str("0").unwrap();
        assert_eq!(at.date_string(), None);
    }

    #[test]
    fn test_rfc3339_with_zulu() {
        let at = CapturedAt::Text("2019-07-04T23:30:00Z".to_string());
        assert_eq!(at.date_string().as_deref(), Some("2019-07-04"));
    }

    #[test]
    fn test_naive_datetime_and_date() {
        let at = CapturedAt::Text("2018-02-01T08:15:00.250".to_string());
        assert_eq!(at.date_string().as_deref(), Some("2018-02-01"));
        let at = CapturedAt::Text("2018-02-01".to_string());
        assert_eq!(at.date_string().as_deref(), Some("2018-02-01"));
    }

    #[test]
    fn test_unparsable_text_is_truncated() {
        let at = CapturedAt::Text("sometime in spring 2017".to_string());
        assert_eq!(at.date_string().as_deref(), Some("sometime i"));
        assert_eq!(CapturedAt::Text("   ".to_string()).date_string(), None);
    }

    #[test]
    fn test_deserializes_number_or_string() {
        let n: CapturedAt = serde_json::from_str("1600000000000").unwrap();
        assert_eq!(n, CapturedAt::Timestamp(1_600_000_000_000.0));
        let s: CapturedAt = serde_json::from_str("\"2020-01-01\"").unwrap();
        assert_eq!(s, CapturedAt::Text("2020-01-01".to_string()));
    }
}
