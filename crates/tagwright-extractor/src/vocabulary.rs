//! Corpus-wide structured tag indexing

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Display;
use tagwright_domain::traits::TagSource;
use tagwright_domain::StructuredTag;
use tracing::{debug, info, warn};

/// Structured tag grammar: lowercase/underscore key, colon-free value
static STRUCTURED_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z_]+):([^:]+)$").expect("structured tag pattern is valid")
});

/// Parse a tag label as a structured `key:value` tag
///
/// Returns `None` for labels outside the grammar, including any label with a
/// second colon, and for values that are blank after trimming.
pub fn parse_structured_tag(label: &str) -> Option<StructuredTag> {
    let caps = STRUCTURED_TAG.captures(label)?;
    let key = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str().trim();
    StructuredTag::new(key, value).ok()
}

/// Enumerate every tag in the corpus
///
/// Tries the corpus-wide listing first and falls back to walking documents
/// one by one. Never fails: an unavailable source yields an empty list.
pub fn enumerate_tags<T>(source: &T) -> Vec<String>
where
    T: TagSource,
    T::Error: Display,
{
    match source.all_tags() {
        Ok(tags) => return tags,
        Err(e) => warn!("Corpus tag listing failed, walking documents instead: {}", e),
    }

    let ids = match source.document_ids() {
        Ok(ids) => ids,
        Err(e) => {
            warn!("Document enumeration failed, continuing with empty vocabulary: {}", e);
            return Vec::new();
        }
    };

    let mut tags = Vec::new();
    for id in &ids {
        match source.document_tags(id) {
            Ok(doc_tags) => tags.extend(doc_tags),
            Err(e) => debug!("Skipping tags of {}: {}", id, e),
        }
    }
    tags
}

/// Per-field value frequencies across the corpus
///
/// The per-key value counts always sum to the number of structured tags seen
/// with that key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFrequencyTable {
    fields: BTreeMap<String, BTreeMap<String, usize>>,
    total: usize,
}

impl FieldFrequencyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from tag labels, ignoring non-structured ones
    pub fn from_tags<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for label in labels {
            if let Some(tag) = parse_structured_tag(label.as_ref()) {
                table.record(tag.key(), tag.value());
            }
        }
        table
    }

    /// Build a table from everything a tag source can enumerate
    pub fn load<T>(source: &T) -> Self
    where
        T: TagSource,
        T::Error: Display,
    {
        let table = Self::from_tags(enumerate_tags(source));
        info!(
            "Indexed {} structured tags across {} fields",
            table.total,
            table.fields.len()
        );
        table
    }

    /// Count one occurrence of `key:value`
    pub fn record(&mut self, key: &str, value: &str) {
        *self
            .fields
            .entry(key.to_string())
            .or_default()
            .entry(value.to_string())
            .or_insert(0) += 1;
        self.total += 1;
    }

    /// Total number of structured tags counted
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether no structured tag was seen
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Field keys, alphabetically
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Occurrences of `key:value`
    pub fn count(&self, key: &str, value: &str) -> usize {
        self.fields
            .get(key)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Number of structured tags with `key`
    pub fn field_total(&self, key: &str) -> usize {
        self.fields
            .get(key)
            .map(|values| values.values().sum())
            .unwrap_or(0)
    }

    /// Values of `key` by descending count, ties broken alphabetically
    pub fn ranked(&self, key: &str) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .fields
            .get(key)
            .map(|values| values.iter().map(|(v, c)| (v.as_str(), *c)).collect())
            .unwrap_or_default();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}
