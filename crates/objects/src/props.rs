use anyhow::{bail, Result};
use serde_json::{Map, Value};

/// Fetch a required string property. Absence (or a non-string value) fails
/// the transformer, which drops the whole observable upstream.
pub fn require_str<'a>(properties: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    match properties.get(key).and_then(|v| v.as_str()) {
        Some(s) => Ok(s),
        None => bail!("missing property '{}'", key),
    }
}

pub fn optional_str<'a>(properties: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    properties
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}

/// Port parsing quirk inherited from the authoring GUI: a missing or
/// non-numeric port becomes 0 instead of failing the observable.
pub fn port_or_zero(properties: &Map<String, Value>, key: &str) -> u16 {
    match properties.get(key) {
        Some(Value::Number(n)) => n.as_u64().and_then(|p| u16::try_from(p).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_require_str() {
        let p = props(json!({"uri": "/index.html"}));
        assert_eq!(require_str(&p, "uri").unwrap(), "/index.html");
        assert!(require_str(&p, "method").is_err());
    }

    #[test]
    fn test_optional_str_filters_blank() {
        let p = props(json!({"user_agent": "  "}));
        assert!(optional_str(&p, "user_agent").is_none());
    }

    #[test]
    fn test_port_quirk_defaults_to_zero() {
        let p = props(json!({"a": "8080", "b": "https", "c": 443, "d": 123456}));
        assert_eq!(port_or_zero(&p, "a"), 8080);
        assert_eq!(port_or_zero(&p, "b"), 0);
        assert_eq!(port_or_zero(&p, "c"), 443);
        assert_eq!(port_or_zero(&p, "d"), 0);
        assert_eq!(port_or_zero(&p, "missing"), 0);
    }
}
