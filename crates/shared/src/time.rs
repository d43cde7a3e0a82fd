//! Time-of-day and timezone parsing helpers.

use chrono::NaiveTime;
use chrono_tz::Tz;
use thiserror::Error;

/// Error type for time parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Parses a wall-clock time of day in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, TimeParseError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| TimeParseError::InvalidTimeOfDay(value.to_string()))
}

/// Formats a time of day as `HH:MM`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses an IANA timezone name such as `America/Santiago`.
pub fn parse_timezone(name: &str) -> Result<Tz, TimeParseError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TimeParseError::UnknownTimezone(name.to_string()))
}
