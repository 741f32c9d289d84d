//! Error handling for the HTTP API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use folio_core::error::FolioError;

/// Body sent for every 500, whatever the cause.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error. please contact the api provider";

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "document not found")
    }

    /// The real cause is logged; the client only sees the fixed message.
    pub fn internal(cause: impl fmt::Display, code: impl Into<String>) -> Self {
        let code = code.into();
        tracing::error!(code = %code, "http error: {}", cause);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, INTERNAL_ERROR_MESSAGE)
    }

    pub fn missing_param(name: &str) -> Self {
        Self::bad_request(format!("missing {} parameter", name))
    }

    pub fn invalid_json() -> Self {
        Self::bad_request("invalid json")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status == StatusCode::NOT_FOUND {
            return (self.status, Json(serde_json::json!({}))).into_response();
        }

        if self.status.is_client_error() {
            tracing::debug!(status = %self.status.as_u16(), "http error: {}", self.message);
        }

        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

// Convert from folio-core errors
impl From<FolioError> for ApiError {
    fn from(err: FolioError) -> Self {
        match err {
            FolioError::Validation { message, .. } => ApiError::bad_request(message),
            FolioError::NotFound { .. } => ApiError::not_found(),
            other => {
                let code = other.code().as_str();
                ApiError::internal(other, code)
            }
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
