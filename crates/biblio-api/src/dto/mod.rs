//! Request and response DTOs.

use biblio_core::error::AppError;
use validator::Validate;

pub mod request;
pub mod response;

/// Runs derive-based validation and folds failures into one message.
pub fn validate<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .into_values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Invalid request".to_string());
        AppError::validation(message)
    })
}
