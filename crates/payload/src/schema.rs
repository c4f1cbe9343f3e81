use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One authored observable as it arrives from the authoring frontend.
/// `observable_properties` is a flat mapping whose keys are defined by the
/// object type's transformer, not validated globally. `related_observables`
/// maps related observable ids to a relation label ("Contains", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservableInput {
    pub observable_id: String,
    pub observable_properties: Map<String, Value>,
    #[serde(default)]
    pub related_observables: HashMap<String, String>,
}

impl ObservableInput {
    /// The declared object type, lower-cased for registry lookup.
    pub fn object_type(&self) -> Option<String> {
        self.observable_properties
            .get("object_type")
            .and_then(|v| v.as_str())
            .map(|s| s.to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorInput {
    pub indicator_id: String,
    pub indicator_title: String,
    #[serde(default)]
    pub indicator_description: String,
    #[serde(default)]
    pub indicator_confidence: String,
    #[serde(default)]
    pub object_type: String,
    /// Input-side observable ids this indicator points at.
    #[serde(default)]
    pub related_observables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub confidence: String,
    #[serde(default)]
    pub handling: String,
    #[serde(default)]
    pub information_source: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub activity_timestamp_from: String,
    #[serde(default)]
    pub activity_timestamp_to: String,
    pub threatactor: Option<ThreatActorInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatActorInput {
    #[serde(default)]
    pub identity_name: String,
    /// Newline-joined alias list, split by the assembler.
    #[serde(default)]
    pub identity_aliases: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub information_source: String,
    #[serde(default)]
    pub confidence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderInput {
    #[serde(default)]
    pub stix_header_title: String,
    #[serde(default)]
    pub stix_header_description: String,
    #[serde(default)]
    pub stix_header_tlp: String,
}

/// Top-level authored bundle. `observables` and `stix_header` stay optional
/// here; the package assembler decides whether their absence is fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub observables: Option<Vec<ObservableInput>>,
    #[serde(default)]
    pub indicators: Vec<IndicatorInput>,
    pub campaign: Option<CampaignInput>,
    pub stix_header: Option<HeaderInput>,
}
