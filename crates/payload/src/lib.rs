pub mod schema;

pub use schema::{
    Bundle, CampaignInput, HeaderInput, IndicatorInput, ObservableInput, ThreatActorInput,
};

use anyhow::{Context, Result};

/// Parse an authored bundle from its JSON wire form.
/// Malformed JSON is fatal for the run; nothing downstream can recover from it.
pub fn parse_bundle(json: &str) -> Result<Bundle> {
    serde_json::from_str(json).context("Failed to parse authored bundle JSON")
}
