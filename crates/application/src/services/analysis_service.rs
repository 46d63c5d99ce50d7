//! The end-to-end analysis pipelines
//!
//! Description pipeline: completeness gate, architecture extraction, STRIDE
//! coordination, document assembly. Codebase pipeline: whitebox scan instead
//! of gate and extraction, always parallel.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use domain::entities::ThreatModel;
use tracing::{info, instrument};

use crate::error::ApplicationError;
use crate::ports::CompletionPort;
use crate::services::architecture_extractor::ArchitectureExtractor;
use crate::services::completeness_checker::CompletenessChecker;
use crate::services::stride_coordinator::StrideCoordinator;
use crate::services::whitebox_scanner::WhiteboxScanner;

/// Application name recorded on description-driven models
const DESCRIPTION_APP_NAME: &str = "Analyzed Application";

/// Application name recorded on codebase-driven models
const WHITEBOX_APP_NAME: &str = "Analyzed Application (Whitebox)";

/// Description recorded on codebase-driven models
const WHITEBOX_APP_DESCRIPTION: &str = "Architecture auto-discovered from code";

/// Character cap applied to the description stored in the model metadata
const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// Facade over the whole analysis pipeline
pub struct AnalysisService {
    checker: CompletenessChecker,
    extractor: ArchitectureExtractor,
    coordinator: StrideCoordinator,
    scanner: WhiteboxScanner,
}

impl fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisService").finish_non_exhaustive()
    }
}

impl AnalysisService {
    pub fn new(completion: Arc<dyn CompletionPort>, max_concurrency: usize) -> Self {
        Self {
            checker: CompletenessChecker::new(Arc::clone(&completion)),
            extractor: ArchitectureExtractor::new(Arc::clone(&completion)),
            coordinator: StrideCoordinator::new(Arc::clone(&completion))
                .with_max_concurrency(max_concurrency),
            scanner: WhiteboxScanner::new(completion),
        }
    }

    /// Run the description pipeline.
    ///
    /// An incomplete description fails with `InsufficientDetail` before any
    /// further completion calls are made.
    #[instrument(skip(self, description), fields(description_len = description.len(), parallel))]
    pub async fn analyze_description(
        &self,
        description: &str,
        model: Option<&str>,
        parallel: bool,
    ) -> Result<ThreatModel, ApplicationError> {
        let report = self.checker.check(description, model).await?;
        if !report.is_complete() {
            return Err(ApplicationError::InsufficientDetail {
                feedback: report.feedback_items(),
            });
        }

        let architecture = self.extractor.extract(description, model).await?;
        let threats = self.coordinator.analyze(&architecture, model, parallel).await;

        info!(threats = threats.len(), "Description analysis finished");

        Ok(ThreatModel::build(
            DESCRIPTION_APP_NAME,
            preview(description),
            architecture,
            threats,
        ))
    }

    /// Run the codebase pipeline: scan, extract, analyze. No completeness
    /// gate, and the STRIDE pass always runs in parallel.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub async fn analyze_codebase(
        &self,
        root: &Path,
        model: Option<&str>,
    ) -> Result<ThreatModel, ApplicationError> {
        let architecture = self.scanner.scan(root, model).await?;
        let threats = self.coordinator.analyze(&architecture, model, true).await;

        info!(threats = threats.len(), "Codebase analysis finished");

        Ok(ThreatModel::build(
            WHITEBOX_APP_NAME,
            WHITEBOX_APP_DESCRIPTION,
            architecture,
            threats,
        ))
    }
}

/// First 100 characters of the description, with a trailing ellipsis when
/// anything was cut
fn preview(description: &str) -> String {
    let mut chars = description.chars();
    let head: String = chars.by_ref().take(DESCRIPTION_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
