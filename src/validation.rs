use chrono::{DateTime, NaiveDateTime, Utc};
use phonenumber::country;

/// Region assumed for numbers written without a country code.
pub const DEFAULT_REGION: country::Id = country::Id::US;

/// Naive formats accepted for show start times, read as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Must be a valid US phone number")]
    InvalidPhone,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} is not a valid state")]
    UnknownState(String),
    #[error("{0} is not a valid genre")]
    UnknownGenre(String),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} is not a valid start time")]
    InvalidTimestamp(String),
    #[error("Artist {0} does not exist")]
    UnknownArtist(i64),
    #[error("Venue {0} does not exist")]
    UnknownVenue(i64),
}

/// Checks that `raw` is a valid phone number in [`DEFAULT_REGION`].
pub fn validate_phone(raw: &str) -> Result<(), ValidationError> {
    let number =
        phonenumber::parse(Some(DEFAULT_REGION), raw).map_err(|_| ValidationError::InvalidPhone)?;

    if phonenumber::is_valid(&number) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

/// Trims `value` and fails with [`ValidationError::MissingField`] when nothing is left.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Blank form inputs are stored as NULL.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_id(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    required(field, raw)?
        .parse()
        .map_err(|_| ValidationError::NotANumber(field))
}

/// Parses the timestamp shapes produced by forms and by `DateTime`'s display impls.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f %:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidTimestamp(raw.to_string()))
}
