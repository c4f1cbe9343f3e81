use crate::model::{CyboxObject, NetworkConnection};
use crate::props::{optional_str, port_or_zero, require_str};
use crate::registry::{ObjectTransformer, Transformed};
use anyhow::Result;
use serde_json::{Map, Value};

/// Network connection between two socket addresses. Both ports inherit the
/// non-numeric-becomes-zero quirk.
pub struct NetworkConnectionTransformer;

impl ObjectTransformer for NetworkConnectionTransformer {
    fn process(&self, properties: &Map<String, Value>) -> Result<Transformed> {
        let connection = NetworkConnection {
            layer4_protocol: optional_str(properties, "layer4_protocol")
                .unwrap_or("TCP")
                .to_uppercase(),
            source_ip: require_str(properties, "src_ip")?.trim().to_string(),
            source_port: port_or_zero(properties, "src_port"),
            destination_ip: require_str(properties, "dst_ip")?.trim().to_string(),
            destination_port: port_or_zero(properties, "dst_port"),
        };
        Ok(Transformed::Single(CyboxObject::NetworkConnection(
            connection,
        )))
    }
}
