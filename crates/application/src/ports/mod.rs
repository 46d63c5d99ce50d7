//! Port definitions for the application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement them.

mod completion_port;
mod task_store;

#[cfg(test)]
pub use completion_port::MockCompletionPort;
pub use completion_port::{CompletionCall, CompletionPort};
#[cfg(test)]
pub use task_store::MockTaskStore;
pub use task_store::{AnalysisFailure, AnalysisState, AnalysisTask, TaskStore};
