//! Data classification value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of data carried by a flow
///
/// Tolerant of casing and unknown values in completion-service output;
/// anything unrecognized becomes `Internal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DataClassification {
    Public,
    #[default]
    Internal,
    Confidential,
    Restricted,
}

impl DataClassification {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Confidential => "confidential",
            Self::Restricted => "restricted",
        }
    }
}

impl From<String> for DataClassification {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "public" => Self::Public,
            "confidential" | "secret" => Self::Confidential,
            "restricted" => Self::Restricted,
            _ => Self::Internal,
        }
    }
}

impl fmt::Display for DataClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
