//! Infrastructure layer - adapters for external systems
//!
//! Implements ports defined in the application layer: the OpenRouter
//! completion adapter, the in-memory task registry, archive intake, and
//! configuration loading.

pub mod adapters;
pub mod archive;
pub mod config;

pub use adapters::{InMemoryTaskRegistry, OpenRouterCompletionAdapter};
pub use archive::{ExtractedCodebase, extract_zip};
pub use config::{AnalysisConfig, AppConfig, ServerConfig};
