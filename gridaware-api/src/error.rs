//! Error types for the Gridaware API
//!
//! All errors serialize as JSON bodies with an error code and a
//! human-readable message, mirrored onto the matching HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gridaware_core::ProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    /// The upstream carbon-intensity API rejected or failed the request
    UpstreamError,

    /// Unexpected internal failure
    InternalError,
}

impl ErrorCode {
    /// Map the code to its HTTP status.
    ///
    /// Upstream failures map to 400 rather than 502: the admin surface
    /// reports them as actionable configuration problems (bad key, bad
    /// zone), not as a gateway fault.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput | ErrorCode::MissingField | ErrorCode::UpstreamError => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ============================================================================
// API ERROR
// ============================================================================

/// Structured error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match &err {
            ProviderError::MissingCredential => Self::missing_field("api_key"),
            _ => Self::new(ErrorCode::UpstreamError, err.to_string()),
        }
    }
}

/// Result alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(
            ErrorCode::InvalidInput.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::UpstreamError.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_credential_maps_to_missing_field() {
        let err = ApiError::from(ProviderError::MissingCredential);
        assert_eq!(err.code, ErrorCode::MissingField);
        assert!(err.message.contains("api_key"));
    }

    #[test]
    fn test_upstream_error_carries_message() {
        let err = ApiError::from(ProviderError::UpstreamApi {
            status: 401,
            message: "Invalid token".to_string(),
            body: String::new(),
        });
        assert_eq!(err.code, ErrorCode::UpstreamError);
        assert!(err.message.contains("Invalid token"));
    }
}
