//! Value Objects - Immutable, identity-less domain primitives

mod analysis_id;
mod data_classification;
mod ids;
mod risk_rating;
mod sensitivity;
mod stride_category;

pub use analysis_id::AnalysisId;
pub use data_classification::DataClassification;
pub use ids::{AssetId, BoundaryId, ComponentId, DataFlowId, ThreatId};
pub use risk_rating::RiskRating;
pub use sensitivity::Sensitivity;
pub use stride_category::StrideCategory;
