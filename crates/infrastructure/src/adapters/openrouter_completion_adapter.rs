//! OpenRouter completion adapter - implements CompletionPort using llm_core

use application::{
    error::ApplicationError,
    ports::{CompletionCall, CompletionPort},
};
use async_trait::async_trait;
use llm_core::{CompletionBackend, CompletionConfig, CompletionError, CompletionRequest, OpenRouterClient};
use tracing::{debug, instrument};

/// Adapter bridging the analysis pipeline to the OpenRouter client
#[derive(Debug)]
pub struct OpenRouterCompletionAdapter {
    client: OpenRouterClient,
}

impl OpenRouterCompletionAdapter {
    /// Create a new adapter with the given configuration
    pub fn new(config: CompletionConfig) -> Result<Self, ApplicationError> {
        let client = OpenRouterClient::new(config).map_err(Self::map_error)?;
        Ok(Self { client })
    }

    /// The model the wrapped client falls back to
    #[must_use]
    pub fn default_model(&self) -> &str {
        self.client.default_model()
    }

    /// Convert llm_core error to application error
    fn map_error(e: CompletionError) -> ApplicationError {
        match e {
            CompletionError::Configuration(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::Completion(other.to_string()),
        }
    }
}

#[async_trait]
impl CompletionPort for OpenRouterCompletionAdapter {
    #[instrument(skip(self, call), fields(prompt_len = call.prompt.len()))]
    async fn complete(&self, call: CompletionCall) -> Result<String, ApplicationError> {
        let request = CompletionRequest::new(call.prompt, call.system_message)
            .with_temperature(call.temperature)
            .with_model_opt(call.model);

        let content = self
            .client
            .complete(request)
            .await
            .map_err(Self::map_error)?;

        debug!(chars = content.len(), "Completion forwarded");

        Ok(content)
    }
}
