//! Common API plumbing: the response envelope, the validated-JSON extractor
//! and the domain-error → HTTP mapping.

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope.
///
/// Every REST endpoint returns data in this wrapper.
/// On success: `{"success": true, "data": {...}}`,
/// on error: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request was processed successfully
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a domain error to its HTTP status and wrap its message in the
/// response envelope.
pub fn domain_error_response<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::FORBIDDEN,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::InvalidRange
        | DomainError::InPast
        | DomainError::SpotUnavailable
        | DomainError::AlreadyStarted
        | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let (status, _) = domain_error_response::<()>(DomainError::Conflict);
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        let (status, _) =
            domain_error_response::<()>(DomainError::not_found("Booking", "id", 7));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthorized_maps_to_403() {
        let (status, _) =
            domain_error_response::<()>(DomainError::Unauthorized("nope".into()));
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn input_errors_map_to_400() {
        for err in [
            DomainError::InvalidRange,
            DomainError::InPast,
            DomainError::SpotUnavailable,
            DomainError::AlreadyStarted,
        ] {
            let (status, _) = domain_error_response::<()>(err);
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }
}
