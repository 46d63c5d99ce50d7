//! Architecture entities extracted from a system description
//!
//! The completion service authors this graph; every field except the
//! identifiers is best-effort. Missing collections deserialize as empty and
//! unknown fields are ignored, so a sparse or over-eager response still
//! yields a usable architecture.

use serde::{Deserialize, Serialize};

use crate::value_objects::{
    AssetId, BoundaryId, ComponentId, DataClassification, DataFlowId, Sensitivity,
};

/// A system component (service, store, UI, external dependency)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default)]
    pub id: ComponentId,
    #[serde(default)]
    pub name: String,
    /// Free-form kind such as "Web UI", "API", "Database"
    #[serde(rename = "type", default)]
    pub component_type: String,
    #[serde(default)]
    pub description: String,
    /// Assets this component touches
    #[serde(default)]
    pub assets: Vec<AssetId>,
    #[serde(default)]
    pub trust_level: String,
}

impl Component {
    /// Create a component with the given identity and kind
    pub fn new(
        id: impl Into<ComponentId>,
        name: impl Into<String>,
        component_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            component_type: component_type.into(),
            description: String::new(),
            assets: Vec::new(),
            trust_level: String::new(),
        }
    }
}

/// A valuable asset referenced by components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub id: AssetId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sensitivity: Sensitivity,
}

impl Asset {
    pub fn new(id: impl Into<AssetId>, name: impl Into<String>, sensitivity: Sensitivity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            sensitivity,
        }
    }
}

/// A directed data flow between two components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFlow {
    #[serde(default)]
    pub id: DataFlowId,
    #[serde(default)]
    pub source: ComponentId,
    #[serde(default)]
    pub destination: ComponentId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data_classification: DataClassification,
}

impl DataFlow {
    pub fn new(
        id: impl Into<DataFlowId>,
        source: impl Into<ComponentId>,
        destination: impl Into<ComponentId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            destination: destination.into(),
            description: String::new(),
            data_classification: DataClassification::default(),
        }
    }
}

/// A named grouping of components sharing a trust level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustBoundary {
    #[serde(default)]
    pub id: BoundaryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub components: Vec<ComponentId>,
}

impl TrustBoundary {
    pub fn new(id: impl Into<BoundaryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            components: Vec::new(),
        }
    }
}

/// The aggregate architecture graph passed between extraction and analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Architecture {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub data_flows: Vec<DataFlow>,
    #[serde(default)]
    pub trust_boundaries: Vec<TrustBoundary>,
}
