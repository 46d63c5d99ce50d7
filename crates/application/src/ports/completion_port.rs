//! Completion-service port
//!
//! The single contract the analysis pipeline has toward the natural-language
//! completion backend: one prompt, one system message, one text reply.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// One completion exchange as the pipeline issues it
#[derive(Debug, Clone)]
pub struct CompletionCall {
    /// User prompt
    pub prompt: String,
    /// System message setting the role
    pub system_message: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Model override; `None` uses the backend's configured default
    pub model: Option<String>,
}

impl CompletionCall {
    /// Create a call with a prompt and system message
    pub fn new(prompt: impl Into<String>, system_message: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_message: system_message.into(),
            temperature: 0.7,
            model: None,
        }
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set an optional model override, keeping the default when `None`
    #[must_use]
    pub fn with_model(mut self, model: Option<&str>) -> Self {
        self.model = model.map(str::to_string);
        self
    }
}

/// Port for the completion backend
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CompletionPort: Send + Sync {
    /// Run one completion and return the raw response text
    async fn complete(&self, call: CompletionCall) -> Result<String, ApplicationError>;
}
