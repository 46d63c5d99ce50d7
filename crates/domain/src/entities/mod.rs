//! Domain entities - Objects with identity and lifecycle

mod architecture;
mod threat;
mod threat_model;

pub use architecture::{Architecture, Asset, Component, DataFlow, TrustBoundary};
pub use threat::{Mitigation, RiskLevel, Threat};
pub use threat_model::{ApplicationInfo, ThreatModel};
