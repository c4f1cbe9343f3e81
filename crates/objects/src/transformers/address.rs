use crate::model::{Address, CyboxObject};
use crate::props::{optional_str, require_str};
use crate::registry::{ObjectTransformer, Transformed};
use anyhow::Result;
use serde_json::{Map, Value};

/// Network address. The category defaults to ipv4-addr, matching what the
/// authoring frontend sends when the author leaves it untouched.
pub struct AddressTransformer;

impl ObjectTransformer for AddressTransformer {
    fn process(&self, properties: &Map<String, Value>) -> Result<Transformed> {
        let address = Address {
            address_value: require_str(properties, "ip_addr")?.trim().to_string(),
            category: optional_str(properties, "category")
                .unwrap_or("ipv4-addr")
                .to_string(),
        };
        Ok(Transformed::Single(CyboxObject::Address(address)))
    }
}
