//! Asset sensitivity value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sensitivity level of a protected asset
///
/// Deserialization never fails: the completion service is inconsistent about
/// casing and occasionally invents levels, so anything unrecognized falls
/// back to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Sensitivity {
    Low,
    #[default]
    Medium,
    High,
}

impl Sensitivity {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl From<String> for Sensitivity {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" | "critical" => Self::High,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
