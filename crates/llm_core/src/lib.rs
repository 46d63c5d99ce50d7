//! LLM Core - completion backend and model routing
//!
//! Provides the completion abstraction used by the analysis pipeline and an
//! OpenRouter client speaking the OpenAI-compatible chat-completions API.

pub mod config;
pub mod error;
pub mod openrouter;
pub mod ports;

pub use config::CompletionConfig;
pub use error::CompletionError;
pub use openrouter::OpenRouterClient;
pub use ports::{CompletionBackend, CompletionRequest};
