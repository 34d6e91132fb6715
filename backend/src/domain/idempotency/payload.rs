//! Canonical payload hashing.

use std::fmt;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// SHA-256 of a canonicalised request payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PayloadHash([u8; 32]);

impl PayloadHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hexadecimal encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PayloadHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hash a JSON payload so key order and whitespace do not matter.
///
/// Object keys are sorted recursively, arrays keep their order, and the
/// compact JSON text is hashed.
///
/// # Examples
/// ```
/// use marketplace::domain::canonicalize_and_hash;
/// use serde_json::json;
///
/// let a = canonicalize_and_hash(&json!({"b": 2, "a": 1}));
/// let b = canonicalize_and_hash(&json!({"a": 1, "b": 2}));
/// assert_eq!(a, b);
/// ```
pub fn canonicalize_and_hash(value: &Value) -> PayloadHash {
    let canonical = canonicalize(value).to_string();
    PayloadHash(Sha256::digest(canonical.as_bytes()).into())
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by_key(|(key, _)| key.as_str());
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, inner)| (key.clone(), canonicalize(inner)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn hex_is_64_chars() {
        let hash = canonicalize_and_hash(&json!({"title": "x"}));
        assert_eq!(hash.to_hex().len(), 64);
        assert_eq!(hash.to_string(), hash.to_hex());
    }

    #[rstest]
    fn nested_key_order_is_ignored() {
        let a = json!({"draft": {"title": "x", "price": 1}, "owner": "u"});
        let b = json!({"owner": "u", "draft": {"price": 1, "title": "x"}});
        assert_eq!(canonicalize_and_hash(&a), canonicalize_and_hash(&b));
    }

    #[rstest]
    fn array_order_matters() {
        let a = json!({"tags": ["React", "CSS"]});
        let b = json!({"tags": ["CSS", "React"]});
        assert_ne!(canonicalize_and_hash(&a), canonicalize_and_hash(&b));
    }

    #[rstest]
    fn different_values_differ() {
        assert_ne!(
            canonicalize_and_hash(&json!({"price": 1})),
            canonicalize_and_hash(&json!({"price": 2}))
        );
    }
}
