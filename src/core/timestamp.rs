//! Timestamp layouts for the record time and for `Time` fields
//!
//! String layouts go through chrono's strftime; the Unix variants encode as
//! JSON numbers so aggregation tools can sort on them without parsing.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const ISO8601_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Layout of an encoded timestamp.
///
/// # Examples
///
/// ```
/// use rust_logger_facade::TimestampFormat;
/// use chrono::Utc;
///
/// let ts = TimestampFormat::Iso8601.format(&Utc::now());
/// assert!(ts.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Seconds since the epoch, as a number.
    Unix,

    /// Milliseconds since the epoch, as a number.
    UnixMillis,

    /// Microseconds since the epoch, as a number.
    UnixMicros,

    /// Any strftime layout, e.g. `%Y-%m-%d %H:%M:%S`.
    Custom(String),
}

impl TimestampFormat {
    /// Render `datetime` as text. Numeric layouts render their decimal digits.
    ///
    /// A custom layout chrono cannot render falls back to ISO 8601.
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format(ISO8601_LAYOUT).to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(layout) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(layout)) {
                    Ok(()) => out,
                    Err(_) => datetime.format(ISO8601_LAYOUT).to_string(),
                }
            }
        }
    }

    /// The first specifier of a custom layout that chrono does not know,
    /// or `None` when the layout renders cleanly.
    #[must_use]
    pub fn invalid_layout(&self) -> Option<&str> {
        match self {
            TimestampFormat::Custom(layout) => StrftimeItems::new(layout)
                .any(|item| matches!(item, Item::Error))
                .then_some(layout.as_str()),
            _ => None,
        }
    }

    /// Render `datetime` as a JSON value: a number for the Unix layouts,
    /// a string otherwise.
    #[must_use]
    pub fn to_json(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::Unix => datetime.timestamp().into(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().into(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().into(),
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_iso8601_layouts() {
        assert_eq!(
            TimestampFormat::Iso8601.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123Z"
        );
        assert_eq!(
            TimestampFormat::Iso8601Micros.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123456Z"
        );
    }

    #[test]
    fn test_development_layout() {
        let format = TimestampFormat::Custom("%Y-%m-%d %H:%M:%S".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025-01-08 10:30:45");
    }

    #[test]
    fn test_unknown_specifier_falls_back_to_iso8601() {
        let format = TimestampFormat::Custom("%Q".to_string());
        assert_eq!(format.invalid_layout(), Some("%Q"));
        assert_eq!(format.format(&fixed_datetime()), "2025-01-08T10:30:45.123Z");
        assert_eq!(
            format.to_json(&fixed_datetime()),
            serde_json::json!("2025-01-08T10:30:45.123Z")
        );
    }

    #[test]
    fn test_known_layouts_are_valid() {
        assert!(TimestampFormat::Custom("%Y-%m-%d %H:%M:%S".to_string())
            .invalid_layout()
            .is_none());
        assert!(TimestampFormat::Iso8601.invalid_layout().is_none());
        assert!(TimestampFormat::UnixMillis.invalid_layout().is_none());
    }

    #[test]
    fn test_numeric_layouts_encode_as_numbers() {
        let dt = fixed_datetime();
        assert_eq!(TimestampFormat::Unix.to_json(&dt), serde_json::json!(1736332245));
        assert_eq!(
            TimestampFormat::UnixMillis.to_json(&dt),
            serde_json::json!(1736332245123i64)
        );
        assert!(TimestampFormat::UnixMicros.to_json(&dt).is_number());
        assert!(TimestampFormat::Rfc3339.to_json(&dt).is_string());
        assert!(TimestampFormat::UnixMicros.is_numeric());
        assert!(!TimestampFormat::Iso8601.is_numeric());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TimestampFormat::UnixMillis).expect("serialize");
        assert_eq!(json, "\"unix_millis\"");

        let format: TimestampFormat =
            serde_json::from_str(r#"{"custom":"%Y-%m-%d"}"#).expect("deserialize custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}
