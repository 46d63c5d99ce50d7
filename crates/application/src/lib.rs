//! Application layer: the analysis pipeline behind both presentation surfaces
//!
//! Services here orchestrate the domain model against the completion port.
//! No HTTP, no CLI, no concrete backend; those live in the outer crates.

pub mod error;
pub mod ports;
pub mod prompts;
pub mod response_parser;
pub mod services;

pub use error::ApplicationError;
pub use ports::{
    AnalysisFailure, AnalysisState, AnalysisTask, CompletionCall, CompletionPort, TaskStore,
};
pub use services::{AnalysisDispatcher, AnalysisService};
