pub mod user_dto;
pub mod appointment_dto;

use chrono::NaiveDate;
use validator::Validate;

use crate::util::error::{HandlerError, HandlerErrorKind};

/// Rejects the request when any named field is absent, null or blank.
pub fn require_fields(fields: &[(&str, &Option<String>)]) -> Result<(), HandlerError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(HandlerError::missing_fields(&missing))
    }
}

/// Dates travel as `YYYY-MM-DD`, which also keeps them sortable as strings.
pub fn require_iso_date(field: &str, value: &str) -> Result<(), HandlerError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            HandlerError::new(HandlerErrorKind::Validation, format!("Invalid {}", field))
                .with_details(format!("{} must be formatted as YYYY-MM-DD", field))
        })
}

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), HandlerError> {
    payload.validate().map_err(|e| {
        HandlerError::new(HandlerErrorKind::Validation, "Validation error").with_details(e.to_string())
    })
}
