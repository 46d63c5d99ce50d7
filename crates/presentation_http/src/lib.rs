//! HTTP presentation layer
//!
//! axum server exposing the analysis pipeline: asynchronous submission of
//! descriptions and codebase archives, status polling, and result retrieval.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;
