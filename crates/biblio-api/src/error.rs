//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use biblio_core::error::{AppError, ErrorKind};

/// Handler result type; `?` on any service call converts through [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// API-layer error wrapper around the domain error.
///
/// Exists so `IntoResponse` can be implemented locally; handlers convert
/// from `AppError` via `?`.
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Error payload.
    pub error: ErrorDetail,
}

/// Machine-readable error code plus human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Error kind, e.g. `NOT_FOUND`.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match err.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Database
            | ErrorKind::Internal
            | ErrorKind::Configuration
            | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(kind = %err.kind, error = %err, "Request failed");
        }

        let body = ApiErrorBody {
            success: false,
            error: ErrorDetail {
                kind: err.kind.to_string(),
                message: err.message,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_409() {
        let response = ApiError::from(AppError::conflict("No copies available")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_pool_exhaustion_maps_to_503() {
        let response =
            ApiError::from(AppError::service_unavailable("Pool exhausted")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_authentication_maps_to_401() {
        let response =
            ApiError::from(AppError::authentication("Invalid user ID or password"))
                .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
