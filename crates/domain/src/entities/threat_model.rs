//! The final threat model document

use serde::{Deserialize, Serialize};

use super::architecture::{Architecture, Asset, Component, DataFlow, TrustBoundary};
use super::threat::Threat;

/// Owner recorded on every generated model
const DEFAULT_OWNER: &str = "Threat Modeling Tool User";

/// Metadata block describing the analyzed application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub name: String,
    pub description: String,
    pub owner: String,
}

/// The assembled threat model: architecture sections flattened to the top
/// level alongside the threat list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatModel {
    pub application: ApplicationInfo,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub data_flows: Vec<DataFlow>,
    #[serde(default)]
    pub trust_boundaries: Vec<TrustBoundary>,
    #[serde(default)]
    pub threats: Vec<Threat>,
}

impl ThreatModel {
    /// Assemble the final document from an architecture and a threat list.
    ///
    /// Never fails; an architecture with missing sections contributes empty
    /// vectors.
    pub fn build(
        name: impl Into<String>,
        description: impl Into<String>,
        architecture: Architecture,
        threats: Vec<Threat>,
    ) -> Self {
        Self {
            application: ApplicationInfo {
                name: name.into(),
                description: description.into(),
                owner: DEFAULT_OWNER.to_string(),
            },
            components: architecture.components,
            assets: architecture.assets,
            data_flows: architecture.data_flows,
            trust_boundaries: architecture.trust_boundaries,
            threats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Sensitivity;

    #[test]
    fn build_flattens_architecture_sections() {
        let architecture = Architecture {
            components: vec![Component::new("web-app", "Web App", "Web UI")],
            assets: vec![Asset::new("creds", "Credentials", Sensitivity::High)],
            data_flows: vec![DataFlow::new("flow-1", "web-app", "sql-db")],
            trust_boundaries: vec![TrustBoundary::new("dmz", "DMZ")],
        };
        let model = ThreatModel::build("App", "desc", architecture, vec![Threat::named("t")]);

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["application"]["name"], "App");
        assert_eq!(json["application"]["owner"], DEFAULT_OWNER);
        assert_eq!(json["components"][0]["id"], "web-app");
        assert_eq!(json["dataFlows"][0]["id"], "flow-1");
        assert_eq!(json["trustBoundaries"][0]["id"], "dmz");
        assert_eq!(json["threats"][0]["name"], "t");
        assert!(json.get("architecture").is_none());
    }

    #[test]
    fn build_with_empty_architecture_yields_empty_sections() {
        let model = ThreatModel::build("App", "desc", Architecture::default(), Vec::new());
        assert!(model.components.is_empty());
        assert!(model.assets.is_empty());
        assert!(model.data_flows.is_empty());
        assert!(model.trust_boundaries.is_empty());
        assert!(model.threats.is_empty());
    }

    #[test]
    fn document_roundtrips() {
        let model = ThreatModel::build(
            "App",
            "desc",
            Architecture::default(),
            vec![Threat::named("a"), Threat::named("b")],
        );
        let json = serde_json::to_string(&model).unwrap();
        let back: ThreatModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
