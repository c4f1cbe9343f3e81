use std::collections::HashMap;

/// Maps synthetic observable ids (minted during 1:N expansion) back to the
/// input id they came from. Indicators reference input ids, so resolution
/// has to go through this table after expansion.
#[derive(Debug, Clone, Default)]
pub struct IdTranslationTable {
    synthetic_to_original: HashMap<String, String>,
}

impl IdTranslationTable {
    pub fn new() -> Self {
        Self {
            synthetic_to_original: HashMap::new(),
        }
    }

    pub fn record(&mut self, synthetic_id: &str, original_id: &str) {
        self.synthetic_to_original
            .insert(synthetic_id.to_string(), original_id.to_string());
    }

    /// The id to compare against indicator references: the original input id
    /// for synthetic ids, the id itself otherwise.
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.synthetic_to_original
            .get(id)
            .map(|s| s.as_str())
            .unwrap_or(id)
    }

    pub fn is_synthetic(&self, id: &str) -> bool {
        self.synthetic_to_original.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.synthetic_to_original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synthetic_to_original.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_through_for_unknown_ids() {
        let table = IdTranslationTable::new();
        assert_eq!(table.resolve("obs-1"), "obs-1");
    }

    #[test]
    fn test_resolve_translates_synthetic_ids() {
        let mut table = IdTranslationTable::new();
        table.record("ns:Observable-1234", "obs-1");

        assert_eq!(table.resolve("ns:Observable-1234"), "obs-1");
        assert!(table.is_synthetic("ns:Observable-1234"));
        assert!(!table.is_synthetic("obs-1"));
    }
}
