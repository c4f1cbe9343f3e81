use crate::model::CyboxObject;
use crate::transformers;
use anyhow::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// What one transformer run produced: a single native object, or several
/// when the authored observable decomposes into multiple schema objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed {
    Single(CyboxObject),
    Multiple(Vec<CyboxObject>),
}

/// Capability implemented once per supported object type. Pure: reads one
/// flat property mapping, no side effects. Failures (missing or invalid
/// properties) are reported as errors and absorbed by the reconciler.
pub trait ObjectTransformer: Send + Sync {
    fn process(&self, properties: &Map<String, Value>) -> Result<Transformed>;
}

/// Open registry of object transformers, keyed by lower-cased type tag.
/// Third-party types register without touching the dispatcher.
pub struct TransformerRegistry {
    transformers: HashMap<String, Box<dyn ObjectTransformer>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// Registry pre-loaded with the built-in object types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("http_session", Box::new(transformers::http_session::HttpSessionTransformer));
        registry.register("file", Box::new(transformers::file::FileTransformer::new()));
        registry.register("address", Box::new(transformers::address::AddressTransformer));
        registry.register("domain_name", Box::new(transformers::domain_name::DomainNameTransformer));
        registry.register(
            "network_connection",
            Box::new(transformers::network_connection::NetworkConnectionTransformer),
        );
        registry.register(
            "email_message",
            Box::new(transformers::email_message::EmailMessageTransformer),
        );
        registry
    }

    pub fn register(&mut self, type_tag: &str, transformer: Box<dyn ObjectTransformer>) {
        debug!(type_tag = type_tag, "Registering object transformer");
        self.transformers
            .insert(type_tag.to_lowercase(), transformer);
    }

    pub fn get(&self, type_tag: &str) -> Option<&dyn ObjectTransformer> {
        self.transformers
            .get(&type_tag.to_lowercase())
            .map(|b| b.as_ref())
    }

    pub fn supported_types(&self) -> Vec<&str> {
        self.transformers.keys().map(|k| k.as_str()).collect()
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, CyboxObject};
    use serde_json::json;

    struct FixedTransformer;

    impl ObjectTransformer for FixedTransformer {
        fn process(&self, _properties: &Map<String, Value>) -> Result<Transformed> {
            Ok(Transformed::Single(CyboxObject::Address(Address {
                address_value: "1.2.3.4".to_string(),
                category: "ipv4-addr".to_string(),
            })))
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = TransformerRegistry::with_builtins();
        assert!(registry.get("HTTP_Session").is_some());
        assert!(registry.get("http_session").is_some());
    }

    #[test]
    fn test_unknown_type_is_none() {
        let registry = TransformerRegistry::with_builtins();
        assert!(registry.get("carrier_pigeon").is_none());
    }

    #[test]
    fn test_third_party_registration() {
        let mut registry = TransformerRegistry::with_builtins();
        registry.register("custom_thing", Box::new(FixedTransformer));

        let transformer = registry.get("Custom_Thing").unwrap();
        let out = transformer
            .process(json!({}).as_object().unwrap())
            .unwrap();
        assert!(matches!(out, Transformed::Single(_)));
    }
}
