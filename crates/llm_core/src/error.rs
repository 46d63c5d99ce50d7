//! Completion backend errors

use thiserror::Error;

/// Errors that can occur while talking to the completion backend
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Failed to connect to the completion server
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the completion server failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Server returned a non-success status
    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during completion
    #[error("Completion timeout after {0}s")]
    Timeout(u64),

    /// Client misconfiguration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(crate::config::default_timeout_secs())
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_message_includes_status() {
        let err = CompletionError::Server {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "Server error (status 503): overloaded");
    }

    #[test]
    fn timeout_message_includes_seconds() {
        let err = CompletionError::Timeout(120);
        assert_eq!(err.to_string(), "Completion timeout after 120s");
    }

    #[test]
    fn invalid_response_message() {
        let err = CompletionError::InvalidResponse("missing choices".to_string());
        assert!(err.to_string().contains("missing choices"));
    }
}
