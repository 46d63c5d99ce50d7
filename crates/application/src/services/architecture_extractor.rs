//! Architecture extraction from a textual description
//!
//! One low-temperature completion call turns a description (or a whitebox
//! scan summary) into the canonical component/asset/data-flow/trust-boundary
//! graph. The only hard structural requirement on the reply is a
//! `components` key; everything else is best-effort.

use std::{fmt, sync::Arc};

use domain::entities::Architecture;
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::{CompletionCall, CompletionPort};
use crate::prompts::ARCHITECTURE_SYSTEM_PROMPT;
use crate::response_parser;

/// Low sampling temperature: extraction favors determinism over creativity
const EXTRACTION_TEMPERATURE: f32 = 0.2;

/// Service extracting the architecture graph via the completion backend
pub struct ArchitectureExtractor {
    completion: Arc<dyn CompletionPort>,
}

impl fmt::Debug for ArchitectureExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchitectureExtractor").finish_non_exhaustive()
    }
}

impl ArchitectureExtractor {
    pub fn new(completion: Arc<dyn CompletionPort>) -> Self {
        Self { completion }
    }

    /// Extract the architecture graph from a description
    #[instrument(skip(self, description), fields(description_len = description.len()))]
    pub async fn extract(
        &self,
        description: &str,
        model: Option<&str>,
    ) -> Result<Architecture, ApplicationError> {
        let prompt = format!(
            "Application Description:\n\n{description}\n\nBased on this description, identify and extract all system architecture elements needed for threat modeling."
        );

        let response = self
            .completion
            .complete(
                CompletionCall::new(prompt, ARCHITECTURE_SYSTEM_PROMPT)
                    .with_temperature(EXTRACTION_TEMPERATURE)
                    .with_model(model),
            )
            .await?;

        let value = response_parser::extract_object(&response)
            .map_err(|e| ApplicationError::ArchitectureParse(e.to_string()))?;

        // The one structural check: an object without `components` means the
        // extraction failed, not that the architecture is legitimately empty.
        if value.get("components").is_none() {
            return Err(ApplicationError::ArchitectureParse(
                "response object lacks the mandatory `components` key".to_string(),
            ));
        }

        let architecture: Architecture = serde_json::from_value(value)
            .map_err(|e| ApplicationError::ArchitectureParse(e.to_string()))?;

        debug!(
            components = architecture.components.len(),
            assets = architecture.assets.len(),
            data_flows = architecture.data_flows.len(),
            trust_boundaries = architecture.trust_boundaries.len(),
            "Architecture extracted"
        );

        Ok(architecture)
    }
}
