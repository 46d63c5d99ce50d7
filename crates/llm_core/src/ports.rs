//! Port definitions for completion backends
//!
//! Defines the trait that completion adapters must implement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;

/// Sampling temperature used when a request does not set one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A single completion exchange: one system message, one user prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// User prompt
    pub prompt: String,
    /// System message setting the role; empty means none
    #[serde(default)]
    pub system_message: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Model override (falls back to the configured default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CompletionRequest {
    /// Create a request with a system message and a user prompt
    pub fn new(prompt: impl Into<String>, system_message: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_message: system_message.into(),
            temperature: DEFAULT_TEMPERATURE,
            model: None,
        }
    }

    /// Create a bare request with no system message
    pub fn simple(prompt: impl Into<String>) -> Self {
        Self::new(prompt, String::new())
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set a model override for this request
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set an optional model override, keeping the default when `None`
    #[must_use]
    pub fn with_model_opt(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// Port for completion backend implementations
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Run one completion and return the raw response text
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;

    /// The model used when requests carry no override
    fn default_model(&self) -> &str;
}
