//! Analysis pipeline configuration.

use serde::{Deserialize, Serialize};

/// Settings for the STRIDE analysis pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Bound on in-flight category completions in parallel mode
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Whether description analyses run the category pass in parallel when
    /// the request does not say
    #[serde(default)]
    pub parallel_default: bool,

    /// Wall-clock bound on one background analysis run in seconds;
    /// `None` means unbounded
    #[serde(default)]
    pub run_timeout_secs: Option<u64>,
}

const fn default_max_concurrency() -> usize {
    3
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            parallel_default: false,
            run_timeout_secs: None,
        }
    }
}
