//! Request and response DTOs.
//!
//! Request and response bodies use camelCase field names; query string
//! parameters stay snake_case.

pub mod request;
pub mod response;

use docq_core::error::AppError;
use validator::Validate;

/// Runs derive-based validation, mapping failures to a validation error.
pub fn validate(dto: &impl Validate) -> Result<(), AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(e.to_string()))
}
