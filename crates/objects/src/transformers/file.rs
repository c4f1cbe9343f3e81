use crate::model::{CyboxObject, FileHash, FileObject};
use crate::props::optional_str;
use crate::registry::{ObjectTransformer, Transformed};
use anyhow::{bail, Result};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

/// File artifact: name, path, size and up to three hash digests. Hash values
/// that do not look like hex digests of the right length are dropped with a
/// warning rather than failing the observable.
pub struct FileTransformer {
    hex_digest: Regex,
}

impl FileTransformer {
    pub fn new() -> Self {
        Self {
            hex_digest: Regex::new(r"^[0-9a-fA-F]+$").unwrap(),
        }
    }

    fn collect_hash(
        &self,
        properties: &Map<String, Value>,
        key: &str,
        hash_type: &str,
        expected_len: usize,
        hashes: &mut Vec<FileHash>,
    ) {
        if let Some(value) = optional_str(properties, key) {
            let value = value.trim();
            if value.len() == expected_len && self.hex_digest.is_match(value) {
                hashes.push(FileHash {
                    hash_type: hash_type.to_string(),
                    value: value.to_lowercase(),
                });
            } else {
                warn!(hash_type = hash_type, "Dropping malformed hash value");
            }
        }
    }
}

impl Default for FileTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectTransformer for FileTransformer {
    fn process(&self, properties: &Map<String, Value>) -> Result<Transformed> {
        let mut hashes = Vec::new();
        self.collect_hash(properties, "hash_md5", "MD5", 32, &mut hashes);
        self.collect_hash(properties, "hash_sha1", "SHA1", 40, &mut hashes);
        self.collect_hash(properties, "hash_sha256", "SHA256", 64, &mut hashes);

        let file = FileObject {
            file_name: optional_str(properties, "file_name").map(str::to_string),
            file_path: optional_str(properties, "file_path").map(str::to_string),
            size_in_bytes: properties.get("size_in_bytes").and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }),
            hashes,
        };

        if file.file_name.is_none() && file.file_path.is_none() && file.hashes.is_empty() {
            bail!("file observable has neither a name, a path nor a valid hash");
        }

        Ok(Transformed::Single(CyboxObject::File(file)))
    }
}
