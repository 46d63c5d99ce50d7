//! Background dispatch of analysis runs
//!
//! The dispatcher registers a pending task, spawns the pipeline on the
//! runtime, and returns the id immediately. Completion or failure lands in
//! the task store; submitters never await the run.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use domain::value_objects::AnalysisId;
use tracing::{error, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{AnalysisFailure, AnalysisTask, TaskStore};
use crate::services::analysis_service::AnalysisService;

/// Dispatcher for asynchronous analysis submissions
pub struct AnalysisDispatcher {
    service: Arc<AnalysisService>,
    store: Arc<dyn TaskStore>,
    run_timeout: Option<Duration>,
}

impl fmt::Debug for AnalysisDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisDispatcher")
            .field("run_timeout", &self.run_timeout)
            .finish_non_exhaustive()
    }
}

impl AnalysisDispatcher {
    pub fn new(service: Arc<AnalysisService>, store: Arc<dyn TaskStore>) -> Self {
        Self {
            service,
            store,
            run_timeout: None,
        }
    }

    /// Bound the wall-clock time of each spawned run; an expired run is
    /// recorded as failed
    #[must_use]
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = Some(timeout);
        self
    }

    /// The store this dispatcher records into
    pub fn store(&self) -> Arc<dyn TaskStore> {
        Arc::clone(&self.store)
    }

    /// Accept a description analysis and return its id immediately
    #[instrument(skip(self, description), fields(description_len = description.len()))]
    pub fn submit_description(
        &self,
        description: String,
        model: Option<String>,
        parallel: bool,
    ) -> AnalysisId {
        let id = self.register();
        let service = Arc::clone(&self.service);
        let store = Arc::clone(&self.store);
        let run_timeout = self.run_timeout;
        let task_id = id;

        tokio::spawn(async move {
            let outcome = run_bounded(run_timeout, async {
                service
                    .analyze_description(&description, model.as_deref(), parallel)
                    .await
            })
            .await;
            record_outcome(&*store, &task_id, outcome);
        });

        id
    }

    /// Accept a codebase analysis over an extracted directory and return its
    /// id immediately. The directory is deleted once the run finishes.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn submit_codebase(&self, root: PathBuf, model: Option<String>) -> AnalysisId {
        let id = self.register();
        let service = Arc::clone(&self.service);
        let store = Arc::clone(&self.store);
        let run_timeout = self.run_timeout;
        let task_id = id;

        tokio::spawn(async move {
            let outcome = run_bounded(run_timeout, async {
                service.analyze_codebase(&root, model.as_deref()).await
            })
            .await;
            record_outcome(&*store, &task_id, outcome);

            if let Err(e) = tokio::fs::remove_dir_all(&root).await {
                warn!(root = %root.display(), error = %e, "Could not remove extracted codebase");
            }
        });

        id
    }

    fn register(&self) -> AnalysisId {
        self.store.evict_finished();
        let id = AnalysisId::new();
        self.store.insert(AnalysisTask::pending(id));
        info!(analysis_id = %id, "Analysis accepted");
        id
    }
}

/// Apply the optional wall-clock bound to a pipeline run
async fn run_bounded<F>(
    timeout: Option<Duration>,
    run: F,
) -> Result<domain::entities::ThreatModel, ApplicationError>
where
    F: std::future::Future<Output = Result<domain::entities::ThreatModel, ApplicationError>>,
{
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, run).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ApplicationError::Internal(format!(
                "analysis did not finish within {}s",
                limit.as_secs()
            ))),
        },
        None => run.await,
    }
}

fn record_outcome(
    store: &dyn TaskStore,
    id: &AnalysisId,
    outcome: Result<domain::entities::ThreatModel, ApplicationError>,
) {
    match outcome {
        Ok(model) => {
            info!(analysis_id = %id, threats = model.threats.len(), "Analysis completed");
            store.complete(id, model);
        }
        Err(e) => {
            error!(analysis_id = %id, error = %e, "Analysis failed");
            store.fail(id, AnalysisFailure::from_error(&e));
        }
    }
}
