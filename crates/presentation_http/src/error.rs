//! API error handling
//!
//! Every failure leaves the server as the standard envelope
//! `{ "error", "code", "details"?, "feedback"? }`. Internal and
//! configuration failures never leak their messages.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Result requested while the analysis is still running
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The analysis finished unsuccessfully; carries actionable feedback
    #[error("Unprocessable: {0}")]
    Unprocessable(String, Vec<String>),

    /// The completion backend failed or produced unusable output
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Actionable feedback items (insufficient-detail failures)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, feedback) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, Vec::new()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, Vec::new()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, Vec::new()),
            Self::Unprocessable(msg, feedback) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable",
                msg,
                feedback,
            ),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg, Vec::new()),
            Self::Internal(_) => (
                // Internal messages stay in the logs, not the response.
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
                Vec::new(),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details: None,
            feedback,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::InsufficientDetail { feedback } => Self::Unprocessable(
                "More details needed for effective threat modeling".to_string(),
                feedback,
            ),
            ApplicationError::MalformedResponse { .. } | ApplicationError::ArchitectureParse(_) => {
                Self::BadGateway(err.to_string())
            }
            ApplicationError::Completion(msg) => Self::BadGateway(msg),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::Io(e) => Self::Internal(e.to_string()),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            }
        }
    }
}
