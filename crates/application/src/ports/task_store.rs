//! Task-store port
//!
//! Defines the registry interface for background analysis runs. The store is
//! the only shared mutable structure in the system; everything else passes
//! data by value.

use chrono::{DateTime, Utc};
use domain::entities::ThreatModel;
use domain::value_objects::AnalysisId;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Terminal failure description recorded on a task
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFailure {
    /// Human-readable failure message
    pub message: String,
    /// Actionable feedback items; non-empty only when the completeness gate
    /// rejected the description
    pub feedback: Vec<String>,
}

impl AnalysisFailure {
    /// Failure with a message and no feedback items
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            feedback: Vec::new(),
        }
    }

    /// Record an application error, carrying feedback through for
    /// insufficient-detail failures
    pub fn from_error(error: &ApplicationError) -> Self {
        Self {
            message: error.to_string(),
            feedback: error.feedback_items().to_vec(),
        }
    }
}

/// Lifecycle state of an analysis run
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    /// Accepted, result not yet available
    Pending,
    /// Finished successfully
    Completed(Box<ThreatModel>),
    /// Finished with an error
    Failed(AnalysisFailure),
}

impl AnalysisState {
    /// Whether the run has reached a terminal state
    pub const fn is_finished(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One registered analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTask {
    pub id: AnalysisId,
    pub state: AnalysisState,
    pub created_at: DateTime<Utc>,
}

impl AnalysisTask {
    /// Create a freshly accepted task
    pub fn pending(id: AnalysisId) -> Self {
        Self {
            id,
            state: AnalysisState::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Port for the in-memory analysis task registry
#[cfg_attr(test, automock)]
pub trait TaskStore: Send + Sync {
    /// Register a task
    fn insert(&self, task: AnalysisTask);

    /// Look up a task by id
    fn get(&self, id: &AnalysisId) -> Option<AnalysisTask>;

    /// Mark a task completed with its result
    fn complete(&self, id: &AnalysisId, model: ThreatModel);

    /// Mark a task failed
    fn fail(&self, id: &AnalysisId, failure: AnalysisFailure);

    /// Opportunistically drop old finished records once the live set grows
    /// past its bound
    fn evict_finished(&self);

    /// Number of registered tasks
    fn len(&self) -> usize;

    /// Whether the registry is empty
    fn is_empty(&self) -> bool;
}
