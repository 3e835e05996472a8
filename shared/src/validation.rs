//! Custom validators used by the request types
//!
//! The request structs in [`crate::types`] declare their constraints with the
//! `validator` derive; the checks that the built-in rules cannot express live here.

use chrono::{NaiveDate, NaiveTime};
use std::borrow::Cow;
use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Reject strings that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

/// Validate a 24h time of day in `HH:MM` form
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    if value.len() != 5 || NaiveTime::parse_from_str(value, "%H:%M").is_err() {
        return Err(error("time_of_day", "must be a time of day formatted as HH:MM"));
    }
    Ok(())
}

/// Validate a repetition scheme such as `10`, `8-12` or `AMRAP`
pub fn validate_reps(value: &str) -> Result<(), ValidationError> {
    validate_not_blank(value)?;
    if value.chars().any(|c| c.is_control()) {
        return Err(error("reps", "must not contain control characters"));
    }
    Ok(())
}

/// An optional date range must not end before it starts
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err(error("date_range", "end_date must not be before start_date"))
        }
        _ => Ok(()),
    }
}
