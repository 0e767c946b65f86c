//! Conversions between wire strings and domain values.

use time::{macros::format_description, Date};
use uuid::Uuid;

use crate::validation::ValidationError;

/// Parses a `YYYY-MM-DD` calendar day.
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, ValidationError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::new(field, "must be a date in YYYY-MM-DD format"))
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_id(field: &'static str, value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| ValidationError::new(field, "must be a valid UUID"))
}
