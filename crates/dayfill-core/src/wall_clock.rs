//! Local wall-clock timestamp parsing.
//!
//! Snapshots coming from the task and calendar stores may carry either naive
//! ISO-8601 timestamps or RFC 3339 timestamps with an offset. Everything is
//! normalised to a naive local time before it reaches the scheduler.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parse a timestamp into local wall-clock time.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Serde adapter for a required timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Serde adapter for an optional timestamp. A blank string counts as unset.
pub mod option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parses_naive_formats() {
        assert_eq!(parse("2026-10-18T09:30:00"), Some(at(9, 30)));
        assert_eq!(parse("2026-10-18T09:30"), Some(at(9, 30)));
        assert_eq!(parse("2026-10-18 09:30:00"), Some(at(9, 30)));
        assert_eq!(parse("2026-10-18T09:30:00.000"), Some(at(9, 30)));
    }

    #[test]
    fn accepts_offset_timestamps() {
        assert!(parse("2026-10-18T09:30:00Z").is_some());
        assert!(parse("2026-10-18T09:30:00+02:00").is_some());
    }

    #[derive(Debug, serde::Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "option::deserialize")]
        at: Option<NaiveDateTime>,
    }

    #[test]
    fn optional_blank_is_none() {
        let held: Holder = serde_json::from_str(r#"{"at":""}"#).unwrap();
        assert_eq!(held.at, None);
        let held: Holder = serde_json::from_str(r#"{"at":"  "}"#).unwrap();
        assert_eq!(held.at, None);
        let held: Holder = serde_json::from_str(r#"{"at":"2026-10-18T09:30"}"#).unwrap();
        assert_eq!(held.at, Some(at(9, 30)));
        assert!(serde_json::from_str::<Holder>(r#"{"at":"soon"}"#).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse("tomorrow-ish"), None);
        assert_eq!(parse(""), None);
    }
}
