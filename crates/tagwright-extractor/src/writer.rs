//! Idempotent write-back of normalized records

use crate::annotation;
use crate::error::ExtractorError;
use std::collections::HashSet;
use std::fmt::Display;
use tagwright_domain::traits::DocumentStore;
use tagwright_domain::{DocumentId, NormalizedRecord};
use tracing::{debug, warn};

/// What a write-back changed on a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Tags newly attached, in output order
    pub tags_added: Vec<String>,
    /// Tags the store refused
    pub tags_failed: usize,
    /// Whether the free-text field was rewritten
    pub extra_changed: bool,
}

impl WriteOutcome {
    /// Whether the write-back left the document as it was
    pub fn is_noop(&self) -> bool {
        self.tags_added.is_empty() && !self.extra_changed
    }
}

/// Merge a record into a document's tags and annotation block
///
/// Only tags missing from the document's current set are staged; a refused
/// tag is logged and skipped. Tag and field changes are committed together,
/// and staged changes are discarded if any store call fails.
pub fn write_back<S>(
    store: &mut S,
    id: &DocumentId,
    record: &NormalizedRecord,
) -> Result<WriteOutcome, ExtractorError>
where
    S: DocumentStore,
    S::Error: Display,
{
    match stage(store, id, record) {
        Ok(outcome) => match store.commit(id) {
            Ok(()) => Ok(outcome),
            Err(e) => {
                store.discard(id);
                Err(ExtractorError::Store(e.to_string()))
            }
        },
        Err(e) => {
            store.discard(id);
            Err(e)
        }
    }
}

fn stage<S>(
    store: &mut S,
    id: &DocumentId,
    record: &NormalizedRecord,
) -> Result<WriteOutcome, ExtractorError>
where
    S: DocumentStore,
    S::Error: Display,
{
    let store_err = |e: S::Error| ExtractorError::Store(e.to_string());
    let mut outcome = WriteOutcome::default();

    let existing: HashSet<String> = store.tags(id).map_err(store_err)?.into_iter().collect();
    for tag in record.tag_strings() {
        if existing.contains(&tag) {
            continue;
        }
        match store.add_tag(id, &tag) {
            Ok(()) => outcome.tags_added.push(tag),
            Err(e) => {
                warn!("Failed to add tag {:?} to {}: {}", tag, id, e);
                outcome.tags_failed += 1;
            }
        }
    }

    let content = annotation::render_content(record);
    let current = store.extra(id).map_err(store_err)?;
    let updated = annotation::upsert(&current, &content);
    if updated != current {
        store.set_extra(id, &updated).map_err(store_err)?;
        outcome.extra_changed = true;
    }

    debug!(
        "Staged {} tags for {} (extra changed: {})",
        outcome.tags_added.len(),
        id,
        outcome.extra_changed
    );
    Ok(outcome)
}
