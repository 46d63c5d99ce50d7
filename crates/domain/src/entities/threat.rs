//! Threat entities produced by category analysis

use serde::{Deserialize, Serialize};

use crate::value_objects::{ComponentId, DataFlowId, RiskRating, ThreatId};

/// Likelihood/impact pair for a threat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskLevel {
    #[serde(default)]
    pub likelihood: RiskRating,
    #[serde(default)]
    pub impact: RiskRating,
}

impl RiskLevel {
    pub const fn new(likelihood: RiskRating, impact: RiskRating) -> Self {
        Self { likelihood, impact }
    }
}

/// A suggested countermeasure for a threat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mitigation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// "preventative", "detective", or "corrective" by convention
    #[serde(rename = "type", default)]
    pub mitigation_type: String,
}

/// A single identified threat
///
/// `id` and `category` are the only fields the pipeline fills in after the
/// fact: a missing category is stamped with the analyzer's label, and a
/// missing id receives a positional `threat-<n>` after collection. Values
/// the completion service supplied are never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ThreatId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub affected_components: Vec<ComponentId>,
    #[serde(default)]
    pub affected_data_flows: Vec<DataFlowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub mitigations: Vec<Mitigation>,
}

impl Threat {
    /// Create a threat with the given name, all other fields empty
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: None,
            description: String::new(),
            affected_components: Vec::new(),
            affected_data_flows: Vec::new(),
            risk_level: None,
            mitigations: Vec::new(),
        }
    }

    /// Stamp a category if none was supplied
    pub fn ensure_category(&mut self, category: impl Into<String>) {
        if self.category.is_none() {
            self.category = Some(category.into());
        }
    }

    /// Stamp an id if none was supplied
    pub fn ensure_id(&mut self, id: ThreatId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_threat_record() {
        let json = r#"{
            "name": "Credential stuffing against login",
            "category": "Spoofing",
            "description": "Reused passwords allow account takeover.",
            "affectedComponents": ["web-app"],
            "affectedDataFlows": ["flow-1"],
            "riskLevel": {"likelihood": "high", "impact": "medium"},
            "mitigations": [
                {"name": "Rate limiting", "description": "Throttle login attempts.", "type": "preventative"}
            ]
        }"#;
        let threat: Threat = serde_json::from_str(json).unwrap();
        assert_eq!(threat.category.as_deref(), Some("Spoofing"));
        assert_eq!(
            threat.risk_level,
            Some(RiskLevel::new(RiskRating::High, RiskRating::Medium))
        );
        assert_eq!(threat.mitigations[0].mitigation_type, "preventative");
    }

    #[test]
    fn minimal_record_fills_defaults() {
        let threat: Threat = serde_json::from_str(r#"{"name": "Something"}"#).unwrap();
        assert!(threat.id.is_none());
        assert!(threat.category.is_none());
        assert!(threat.affected_components.is_empty());
        assert!(threat.risk_level.is_none());
    }

    #[test]
    fn ensure_category_does_not_overwrite() {
        let mut threat = Threat::named("t");
        threat.ensure_category("Spoofing");
        assert_eq!(threat.category.as_deref(), Some("Spoofing"));
        threat.ensure_category("Tampering");
        assert_eq!(threat.category.as_deref(), Some("Spoofing"));
    }

    #[test]
    fn ensure_id_does_not_overwrite() {
        let mut threat = Threat::named("t");
        threat.ensure_id(ThreatId::new("llm-chosen"));
        threat.ensure_id(ThreatId::positional(4));
        assert_eq!(threat.id.as_ref().unwrap().as_str(), "llm-chosen");
    }

    #[test]
    fn absent_optionals_are_omitted_from_json() {
        let threat = Threat::named("t");
        let json = serde_json::to_value(&threat).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("category").is_none());
        assert!(json.get("riskLevel").is_none());
    }

    #[test]
    fn risk_level_tolerates_odd_casing() {
        let level: RiskLevel =
            serde_json::from_str(r#"{"likelihood": "High", "impact": "whatever"}"#).unwrap();
        assert_eq!(level.likelihood, RiskRating::High);
        assert_eq!(level.impact, RiskRating::Medium);
    }
}
