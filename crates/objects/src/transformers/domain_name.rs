use crate::model::{CyboxObject, DomainName};
use crate::props::{optional_str, require_str};
use crate::registry::{ObjectTransformer, Transformed};
use anyhow::Result;
use serde_json::{Map, Value};

pub struct DomainNameTransformer;

impl ObjectTransformer for DomainNameTransformer {
    fn process(&self, properties: &Map<String, Value>) -> Result<Transformed> {
        let domain = DomainName {
            value: require_str(properties, "domain")?.trim().to_lowercase(),
            domain_type: optional_str(properties, "domain_type")
                .unwrap_or("FQDN")
                .to_string(),
        };
        Ok(Transformed::Single(CyboxObject::DomainName(domain)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_domain_is_normalized() {
        let out = DomainNameTransformer
            .process(json!({"domain": "Evil.Example.COM "}).as_object().unwrap())
            .unwrap();
        match out {
            Transformed::Single(CyboxObject::DomainName(d)) => {
                assert_eq!(d.value, "evil.example.com");
                assert_eq!(d.domain_type, "FQDN");
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }
}
