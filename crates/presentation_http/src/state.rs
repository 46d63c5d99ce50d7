//! Application state shared across handlers

use std::sync::Arc;

use application::{AnalysisDispatcher, TaskStore};

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    /// Background dispatcher for analysis runs
    pub dispatcher: Arc<AnalysisDispatcher>,
    /// Registry the dispatcher records into
    pub store: Arc<dyn TaskStore>,
    /// Parallel-mode default applied when a submission does not say
    pub parallel_default: bool,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("parallel_default", &self.parallel_default)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(dispatcher: Arc<AnalysisDispatcher>, parallel_default: bool) -> Self {
        let store = dispatcher.store();
        Self {
            dispatcher,
            store,
            parallel_default,
        }
    }
}
