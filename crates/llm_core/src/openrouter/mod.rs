//! OpenRouter completion client
//!
//! Speaks the OpenAI-compatible chat-completions API and routes model names
//! across vendors via prefix normalization.

mod client;

pub use client::{OpenRouterClient, normalize_model_name};
