//! Shared storage helper functions.
//!
//! Timestamp handling used across storage backend implementations.
//! Timestamps are stored as fixed-precision RFC3339 text in UTC, so their
//! byte order is their chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

use super::{Result, StorageError};


/// Drop sub-millisecond precision so a value survives a storage round trip.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

/// Format a timestamp for storage: RFC3339, millisecond precision, `Z` suffix.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| StorageError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}
