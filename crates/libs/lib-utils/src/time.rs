//! # Time Utilities
//!
//! Utilities for time formatting and manipulation using chrono.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Parse RFC3339 string to UTC DateTime.
pub fn parse_utc(moment: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(moment)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp(moment.to_string()))
}

// region:    --- Error
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The input is not an RFC3339 timestamp.
    InvalidTimestamp(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidTimestamp(moment) => write!(fmt, "'{moment}' is not an RFC3339 timestamp"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
