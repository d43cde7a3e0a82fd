//! Common validation utilities.

use validator::ValidationError;

lazy_static::lazy_static! {
    /// `HH:MM` or `HH:MM:SS`, 24-hour clock.
    pub static ref TIME_OF_DAY_REGEX: regex::Regex =
        regex::Regex::new(r"^([01]\d|2[0-3]):[0-5]\d(:[0-5]\d)?$").unwrap();
}

/// Validates a wall-clock time of day string.
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    if TIME_OF_DAY_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_of_day_format");
        err.message = Some("Time must use the HH:MM 24-hour format".into());
        Err(err)
    }
}
