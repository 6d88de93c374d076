//! Error types for web handlers.
//!
//! Bridges the domain's `CoreError` taxonomy into HTTP responses. Clients
//! receive a structured `{success, message, code}` body; source chains are
//! logged, never exposed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use villagestay_core::error::CoreError;

/// Application error type for web handlers.
///
/// Implements Axum's `IntoResponse`, so handlers can simply return
/// `Result<_, ApiError>` and use `?` on service calls.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: &'static str,
}

impl ApiError {
    /// Create a new application error
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: &'static str) -> Self {
        Self {
            status,
            message,
            code,
        }
    }

    /// 400 Bad Request
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into(), "BAD_REQUEST")
    }

    /// 401 Unauthorized
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into(), "UNAUTHORIZED")
    }

    /// 403 Forbidden
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message.into(), "FORBIDDEN")
    }

    /// 404 Not Found
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message.into(), "NOT_FOUND")
    }

    /// 503 Service Unavailable
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "UNAVAILABLE",
        )
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => Self::not_found(err.to_string()),
            CoreError::Forbidden(message) => Self::forbidden(message),
            CoreError::Invalid(message) => Self::bad_request(message),
            CoreError::Unavailable(source) => {
                tracing::error!(error = %source, "storage call failed");
                Self::unavailable("service temporarily unavailable, please retry")
            },
        }
    }
}

/// Error body shape shared by every failed response
#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            message: &self.message,
            code: self.code,
        });
        (self.status, body).into_response()
    }
}
