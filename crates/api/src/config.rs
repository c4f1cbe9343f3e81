use serde::{Deserialize, Serialize};
use transform::TransformConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub transform: TransformConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            transform: TransformConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Bind address override via STIX_API_BIND, defaults otherwise.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("STIX_API_BIND") {
            config.bind_addr = addr;
        }
        config
    }
}
