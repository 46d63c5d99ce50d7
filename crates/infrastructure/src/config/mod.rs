//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `analysis`: STRIDE pipeline settings
//!
//! Completion backend settings come from `llm_core::CompletionConfig` and sit
//! under the `completion` section.

mod analysis;
mod server;

use llm_core::CompletionConfig;
use serde::{Deserialize, Serialize};

pub use analysis::AnalysisConfig;
pub use server::ServerConfig;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion backend settings
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Analysis pipeline settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// Precedence, lowest first: built-in defaults, `strideforge.toml` in the
    /// working directory (optional), then environment variables prefixed with
    /// `STRIDEFORGE`. Sections nest with a double underscore so field names
    /// containing underscores stay intact: `STRIDEFORGE_COMPLETION__API_KEY`,
    /// `STRIDEFORGE_SERVER__PORT`, `STRIDEFORGE_ANALYSIS__MAX_CONCURRENCY`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("strideforge")
    }

    /// Load configuration with an explicit file stem (any format the config
    /// crate recognizes)
    pub fn load_from(file_stem: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(environment());

        let loaded = builder.build()?;
        loaded.try_deserialize()
    }
}

/// Environment source shared by `load_from` and the tests. A single
/// underscore after the prefix, then `__` between nesting levels, so
/// `api_key` and friends survive as one key.
fn environment() -> config::Environment {
    config::Environment::with_prefix("STRIDEFORGE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
