//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Completion-service output could not be coerced into the expected
    /// JSON shape after every parse strategy
    #[error("Malformed completion response during {stage}: {reason}")]
    MalformedResponse { stage: String, reason: String },

    /// The description failed the completeness gate; carries the feedback
    /// items to surface to the caller
    #[error("More details needed for effective threat modeling: {}", feedback.join("; "))]
    InsufficientDetail { feedback: Vec<String> },

    /// Recovered JSON was unusable as an architecture (missing `components`)
    #[error("Failed to parse system architecture: {0}")]
    ArchitectureParse(String),

    /// Completion backend failure
    #[error("Completion error: {0}")]
    Completion(String),

    /// Filesystem error during scanning or intake
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Feedback items for an insufficient-detail failure, empty otherwise
    pub fn feedback_items(&self) -> &[String] {
        match self {
            Self::InsufficientDetail { feedback } => feedback,
            _ => &[],
        }
    }
}
