//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Identifier could not be parsed
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Unknown STRIDE category name
    #[error("Unknown STRIDE category: {0}")]
    UnknownCategory(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
