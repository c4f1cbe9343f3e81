use crate::model::{CyboxObject, HttpSession};
use crate::props::{optional_str, port_or_zero, require_str};
use crate::registry::{ObjectTransformer, Transformed};
use anyhow::Result;
use serde_json::{Map, Value};

/// HTTP session: one client request with request line and parsed header
/// fields. Method, uri and host are required; the port falls back to 0 when
/// non-numeric (authoring GUI quirk, kept as-is).
pub struct HttpSessionTransformer;

impl ObjectTransformer for HttpSessionTransformer {
    fn process(&self, properties: &Map<String, Value>) -> Result<Transformed> {
        let session = HttpSession {
            method: require_str(properties, "method")?.to_string(),
            uri: require_str(properties, "uri")?.to_string(),
            host: require_str(properties, "host")?.to_string(),
            port: port_or_zero(properties, "port"),
            user_agent: optional_str(properties, "user_agent").map(str::to_string),
        };
        Ok(Transformed::Single(CyboxObject::HttpSession(session)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn process(value: Value) -> Result<Transformed> {
        HttpSessionTransformer.process(value.as_object().unwrap())
    }

    #[test]
    fn test_full_session() {
        let out = process(json!({
            "object_type": "http_session",
            "method": "GET",
            "uri": "/download.php?id=7",
            "host": "evil.example.com",
            "port": "8080",
            "user_agent": "Mozilla/5.0"
        }))
        .unwrap();

        match out {
            Transformed::Single(CyboxObject::HttpSession(s)) => {
                assert_eq!(s.method, "GET");
                assert_eq!(s.port, 8080);
                assert_eq!(s.user_agent.as_deref(), Some("Mozilla/5.0"));
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_port_becomes_zero() {
        let out = process(json!({
            "method": "POST",
            "uri": "/",
            "host": "example.com",
            "port": "https"
        }))
        .unwrap();

        match out {
            Transformed::Single(CyboxObject::HttpSession(s)) => assert_eq!(s.port, 0),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_missing_uri_fails() {
        let err = process(json!({"method": "GET", "host": "example.com"})).unwrap_err();
        assert!(err.to_string().contains("uri"));
    }
}
