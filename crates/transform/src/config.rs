use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-run configuration: the organizational id namespace and the tool
/// provenance stamped into the header. Passed explicitly into every run so
/// no state leaks between transformations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    pub namespace_name: String,
    pub namespace_prefix: String,
    pub tool_name: String,
    pub tool_vendor: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            namespace_name: "cert.example.com".to_string(),
            namespace_prefix: "example_cert".to_string(),
            tool_name: "Threat Authoring GUI".to_string(),
            tool_vendor: "Example CERT".to_string(),
        }
    }
}

impl TransformConfig {
    /// Mint a namespaced id, e.g. `example_cert:Observable-<uuid>`.
    pub fn mint_id(&self, kind: &str) -> String {
        format!("{}:{}-{}", self.namespace_prefix, kind, Uuid::new_v4())
    }

    pub fn namespace_uri(&self) -> String {
        format!("http://{}", self.namespace_name)
    }
}
