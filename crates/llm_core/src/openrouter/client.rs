//! OpenRouter chat-completions client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::CompletionConfig;
use crate::error::CompletionError;
use crate::ports::{CompletionBackend, CompletionRequest};

/// Vendor prefixes OpenRouter accepts as-is; anything else is assumed to be
/// a bare OpenAI model name
const KNOWN_VENDOR_PREFIXES: [&str; 3] = ["openai/", "anthropic/", "deepseek/"];

/// Normalize a model name for OpenRouter routing
///
/// Bare names like "gpt-4o-mini" become "openai/gpt-4o-mini"; names already
/// carrying a known vendor prefix pass through unchanged.
#[must_use]
pub fn normalize_model_name(model: &str) -> String {
    if KNOWN_VENDOR_PREFIXES.iter().any(|p| model.starts_with(p)) {
        model.to_string()
    } else {
        format!("openai/{model}")
    }
}

/// Completion backend talking to OpenRouter (or any OpenAI-compatible server)
pub struct OpenRouterClient {
    client: Client,
    config: CompletionConfig,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("base_url", &self.config.base_url)
            .field("default_model", &self.config.default_model)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    /// Create a new client from configuration
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::Configuration(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.default_model,
            "Initialized completion client"
        );

        Ok(Self { client, config })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Pick and normalize the model for a request
    fn resolve_model(&self, request: &CompletionRequest) -> String {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);
        normalize_model_name(model)
    }
}

/// OpenAI-format chat request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage {
    role: &'static str,
    content: String,
}

/// OpenAI-format chat response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionBackend for OpenRouterClient {
    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request)))]
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let model = self.resolve_model(&request);

        let mut messages = Vec::with_capacity(2);
        if !request.system_message.is_empty() {
            messages.push(ChatRequestMessage {
                role: "system",
                content: request.system_message,
            });
        }
        messages.push(ChatRequestMessage {
            role: "user",
            content: request.prompt,
        });

        let body = ChatCompletionRequest {
            model,
            messages,
            temperature: request.temperature,
        };

        debug!("Sending chat completion request");

        let mut http_request = self.client.post(self.api_url("chat/completions")).json(&body);
        if let Some(key) = self.config.api_key_str() {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(status, body = %message, "Completion request failed");
            return Err(CompletionError::Server { status, message });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::InvalidResponse("response carried no message content".to_string())
            })?;

        debug!(chars = content.len(), "Completion received");

        Ok(content)
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
