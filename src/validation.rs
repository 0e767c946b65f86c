//! Field-level checks shared by the per-entity `validate` methods.

use thiserror::Error;
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// `min < value <= max`
pub fn in_range_exclusive_min<T>(
    field: &'static str,
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value > min && value <= max {
        return Ok(());
    }
    Err(ValidationError::new(
        field,
        format!("must be greater than {min} and at most {max}"),
    ))
}

/// `min <= value <= max`
pub fn in_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), ValidationError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value >= min && value <= max {
        return Ok(());
    }
    Err(ValidationError::new(
        field,
        format!("must be between {min} and {max}"),
    ))
}

pub fn not_after_now(
    field: &'static str,
    value: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), ValidationError> {
    if value > now {
        return Err(ValidationError::new(field, "must not be in the future"));
    }
    Ok(())
}

pub fn not_after_today(field: &'static str, value: Date, today: Date) -> Result<(), ValidationError> {
    if value > today {
        return Err(ValidationError::new(field, "must not be in the future"));
    }
    Ok(())
}
