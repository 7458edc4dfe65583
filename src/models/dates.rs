//! Calendar date handling at the API boundary.
//!
//! The backend sends dates as `YYYY-MM-DD`, sometimes with a time part
//! (`2024-01-01 10:30:00`, `2024-01-01T10:30:00Z`). Only the calendar day is
//! kept so that date arithmetic never sees a time of day.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DATE_FMT: &str = "%Y-%m-%d";

/// Parse a backend date string into a calendar day.
/// Empty strings yield `None`.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FMT) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    None
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// `#[serde(with = "optional_date")]` for `Option<NaiveDate>` fields
pub mod optional_date {
    use chrono::NaiveDate;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&super::format_calendar_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_calendar_date(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", s))),
        }
    }
}
