//! Per-category threat analysis
//!
//! One parametrized analyzer covers all six STRIDE categories; they differ
//! only in prompt text and label. Analysis never fails: a completion or
//! parse failure logs a warning and yields an empty threat list, because a
//! missing category is better than aborting the whole run.

use std::{fmt, sync::Arc};

use domain::entities::{Architecture, Threat};
use domain::value_objects::StrideCategory;
use tracing::{debug, instrument, warn};

use crate::ports::{CompletionCall, CompletionPort};
use crate::prompts::category_system_prompt;
use crate::response_parser;

/// Moderately raised temperature: threat enumeration favors variety
const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Analyzer for one STRIDE category
pub struct CategoryAnalyzer {
    category: StrideCategory,
    completion: Arc<dyn CompletionPort>,
}

impl fmt::Debug for CategoryAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryAnalyzer")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

impl CategoryAnalyzer {
    pub fn new(category: StrideCategory, completion: Arc<dyn CompletionPort>) -> Self {
        Self {
            category,
            completion,
        }
    }

    /// The category this analyzer covers
    pub const fn category(&self) -> StrideCategory {
        self.category
    }

    /// Analyze the architecture for this category's threats.
    ///
    /// The full architecture graph goes into the prompt verbatim. Returns an
    /// empty list on any failure.
    #[instrument(skip(self, architecture), fields(category = %self.category))]
    pub async fn analyze(&self, architecture: &Architecture, model: Option<&str>) -> Vec<Threat> {
        let Ok(serialized) = serde_json::to_string_pretty(architecture) else {
            warn!(category = %self.category, "Could not serialize architecture for analysis");
            return Vec::new();
        };

        let prompt = format!(
            "System Architecture:\n{serialized}\n\nIdentify all potential {} threats in this system.",
            self.category.label()
        );

        let response = match self
            .completion
            .complete(
                CompletionCall::new(prompt, category_system_prompt(self.category))
                    .with_temperature(ANALYSIS_TEMPERATURE)
                    .with_model(model),
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(category = %self.category, error = %e, "Category analysis call failed");
                return Vec::new();
            }
        };

        let value = match response_parser::extract_array(&response) {
            Ok(value) => value,
            Err(e) => {
                warn!(category = %self.category, error = %e, "Could not extract threat array");
                return Vec::new();
            }
        };

        let mut threats: Vec<Threat> = match serde_json::from_value(value) {
            Ok(threats) => threats,
            Err(e) => {
                warn!(category = %self.category, error = %e, "Threat records had an unusable shape");
                return Vec::new();
            }
        };

        for threat in &mut threats {
            threat.ensure_category(self.category.label());
        }

        debug!(category = %self.category, count = threats.len(), "Category analysis finished");

        threats
    }
}
