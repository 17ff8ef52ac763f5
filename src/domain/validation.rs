use regex::Regex;

use thiserror::Error;

lazy_static::lazy_static! {
    static ref UUID_REGEX: Regex =
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap();
    // ASCII digits only, `\d` would also accept other Unicode digit classes
    static ref DATE_REGEX: Regex = Regex::new(r"^(0[1-9]|1[0-2])-[0-9]{4}$").unwrap();
}

/// Malformed client input, rejected before anything reaches the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid UUID format: {0}")]
    InvalidUuid(String),

    #[error("invalid date format: {0}, expected format MM-YYYY")]
    InvalidDate(String),

    #[error("{0} is required")]
    MissingParameter(&'static str),
}

/// Check that `value` is a canonical, lowercase, hyphenated UUID
pub fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    if !UUID_REGEX.is_match(value) {
        return Err(ValidationError::InvalidUuid(value.into()));
    }
    Ok(())
}

/// Check that `value` is a `MM-YYYY` month
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if !DATE_REGEX.is_match(value) {
        return Err(ValidationError::InvalidDate(value.into()));
    }
    Ok(())
}
