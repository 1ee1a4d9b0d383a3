//! Timestamp formatting utilities
//!
//! Provides standardized, configurable timestamp formats for rendered records.
//! Supports ISO 8601, RFC 3339, Unix timestamps, and custom formats.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use pipe_logger::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now());
/// // Output: "2025-01-08T10:30:45.123Z"
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    ///
    /// Higher precision for ordering concurrent records.
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456789+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format, interpreted as UTC
    ///
    /// ```
    /// use pipe_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Parse text produced by [`format`](Self::format) back into a timestamp
    ///
    /// Precision is whatever the format kept; custom formats without a full
    /// date and time yield `None`.
    pub fn parse(&self, text: &str) -> Option<DateTime<Utc>> {
        match self {
            TimestampFormat::Iso8601 | TimestampFormat::Iso8601Micros | TimestampFormat::Rfc3339 => {
                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }
            TimestampFormat::Unix => DateTime::from_timestamp(text.parse().ok()?, 0),
            TimestampFormat::UnixMillis => DateTime::from_timestamp_millis(text.parse().ok()?),
            TimestampFormat::UnixMicros => DateTime::from_timestamp_micros(text.parse().ok()?),
            TimestampFormat::Custom(format_str) => NaiveDateTime::parse_from_str(text, format_str)
                .ok()
                .map(|naive| naive.and_utc()),
        }
    }
}
