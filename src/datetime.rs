//! Timestamp formatting for API payloads.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC time as RFC 3339 with millisecond precision and a `Z` suffix
/// (e.g. `2025-01-15T10:30:00.000Z`), the shape browsers produce for
/// `Date.toISOString()`.
pub fn to_iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The current time formatted with [`to_iso8601`].
pub fn now_iso8601() -> String {
    to_iso8601(&Utc::now())
}
