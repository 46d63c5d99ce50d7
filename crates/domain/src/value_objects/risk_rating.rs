//! Risk rating value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rating used for both likelihood and impact of a threat
///
/// Unrecognized completion-service values fall back to `Medium` rather than
/// failing the threat deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RiskRating {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskRating {
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

impl From<String> for RiskRating {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" | "critical" | "severe" => Self::High,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
