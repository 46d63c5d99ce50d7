//! Completeness gate for textual descriptions
//!
//! One completion call asking whether the description carries enough detail
//! for STRIDE modeling. An incomplete verdict stops the pipeline before any
//! architecture extraction happens.

use std::{fmt, sync::Arc};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::{CompletionCall, CompletionPort};
use crate::prompts::COMPLETENESS_SYSTEM_PROMPT;
use crate::response_parser;

/// Fallback feedback when the verdict is "no" but no items were supplied
const DEFAULT_FEEDBACK: &str = "The description lacks sufficient detail for analysis.";

/// Feedback payload: either a list of items or one free-text remark
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Feedback {
    Items(Vec<String>),
    Text(String),
}

/// Parsed completeness verdict
#[derive(Debug, Clone, Deserialize)]
pub struct CompletenessReport {
    /// "yes" or "no"; anything other than "no" counts as complete
    #[serde(default)]
    pub complete: String,
    #[serde(default)]
    pub feedback: Option<Feedback>,
    /// Brief system summary supplied on a complete verdict
    #[serde(default)]
    pub confirmation: Option<String>,
}

impl CompletenessReport {
    /// Whether the description passed the gate. Only an explicit "no"
    /// (case-insensitive) counts as incomplete; a junk verdict passes,
    /// matching the lenient read of completion output everywhere else.
    pub fn is_complete(&self) -> bool {
        !self.complete.eq_ignore_ascii_case("no")
    }

    /// Feedback normalized to a list of displayable items
    pub fn feedback_items(&self) -> Vec<String> {
        match &self.feedback {
            Some(Feedback::Items(items)) if !items.is_empty() => items.clone(),
            Some(Feedback::Text(text)) if !text.trim().is_empty() => vec![text.clone()],
            _ => vec![DEFAULT_FEEDBACK.to_string()],
        }
    }
}

/// Gate service asking the completion backend for a completeness verdict
pub struct CompletenessChecker {
    completion: Arc<dyn CompletionPort>,
}

impl fmt::Debug for CompletenessChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletenessChecker").finish_non_exhaustive()
    }
}

impl CompletenessChecker {
    pub fn new(completion: Arc<dyn CompletionPort>) -> Self {
        Self { completion }
    }

    /// Ask whether the description is detailed enough for STRIDE modeling
    #[instrument(skip(self, description), fields(description_len = description.len()))]
    pub async fn check(
        &self,
        description: &str,
        model: Option<&str>,
    ) -> Result<CompletenessReport, ApplicationError> {
        let prompt = format!(
            "Application Description:\n\n{description}\n\nIs this description detailed enough for STRIDE threat modeling?"
        );

        let response = self
            .completion
            .complete(CompletionCall::new(prompt, COMPLETENESS_SYSTEM_PROMPT).with_model(model))
            .await?;

        let value = response_parser::extract_object(&response).map_err(|e| {
            ApplicationError::MalformedResponse {
                stage: "completeness check".to_string(),
                reason: e.to_string(),
            }
        })?;

        let report: CompletenessReport =
            serde_json::from_value(value).map_err(|e| ApplicationError::MalformedResponse {
                stage: "completeness check".to_string(),
                reason: e.to_string(),
            })?;

        debug!(complete = %report.complete, "Completeness verdict received");

        Ok(report)
    }
}
