//! STRIDE threat category value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// The six STRIDE threat categories
///
/// `ALL` fixes the canonical analysis order; sequential coordination walks
/// the categories in exactly this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrideCategory {
    Spoofing,
    Tampering,
    Repudiation,
    InformationDisclosure,
    DenialOfService,
    ElevationOfPrivilege,
}

impl StrideCategory {
    /// All categories in canonical order
    pub const ALL: [Self; 6] = [
        Self::Spoofing,
        Self::Tampering,
        Self::Repudiation,
        Self::InformationDisclosure,
        Self::DenialOfService,
        Self::ElevationOfPrivilege,
    ];

    /// Human-readable category label, as stamped onto threats
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Spoofing => "Spoofing",
            Self::Tampering => "Tampering",
            Self::Repudiation => "Repudiation",
            Self::InformationDisclosure => "Information Disclosure",
            Self::DenialOfService => "Denial of Service",
            Self::ElevationOfPrivilege => "Elevation of Privilege",
        }
    }
}

impl fmt::Display for StrideCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for StrideCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "spoofing" | "s" => Ok(Self::Spoofing),
            "tampering" | "t" => Ok(Self::Tampering),
            "repudiation" | "r" => Ok(Self::Repudiation),
            "information disclosure" | "info disclosure" | "i" => {
                Ok(Self::InformationDisclosure)
            }
            "denial of service" | "dos" | "d" => Ok(Self::DenialOfService),
            "elevation of privilege" | "privilege escalation" | "e" => {
                Ok(Self::ElevationOfPrivilege)
            }
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}
