//! Structured tags: `key:value` labels that encode metadata as plain tags

use std::fmt;

/// A `key:value` tag
///
/// Identity is the exact composed string. Keys are lowercase ASCII letters and
/// underscores; values never contain a colon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuredTag {
    key: String,
    value: String,
}

impl StructuredTag {
    /// Create a structured tag from a field key and a value
    ///
    /// # Errors
    /// Returns error if the key is not `[a-z_]+` or the value is empty or
    /// contains a colon
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        let value = value.into();

        if !is_valid_key(&key) {
            return Err(format!("Invalid tag key: {:?}", key));
        }
        if value.trim().is_empty() {
            return Err(format!("Empty value for tag key {}", key));
        }
        if value.contains(':') {
            return Err(format!("Tag value may not contain ':': {:?}", value));
        }

        Ok(Self { key, value })
    }

    /// Get the field key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for StructuredTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

/// Whether `key` is a non-empty run of lowercase ASCII letters and underscores
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_lowercase() || b == b'_')
}
