//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and the
//! host library. Infrastructure implementations live in other crates.

use crate::document::{DocumentContext, DocumentId};

/// Enumerates tags across the whole corpus
///
/// Implemented by the infrastructure layer (tagwright-store)
pub trait TagSource {
    /// Error type for enumeration
    type Error;

    /// Every tag label in the corpus, one entry per (document, tag) pair
    fn all_tags(&self) -> Result<Vec<String>, Self::Error>;

    /// Ids of every document in the corpus (fallback enumeration)
    fn document_ids(&self) -> Result<Vec<DocumentId>, Self::Error>;

    /// Tags attached to a single document (fallback enumeration)
    fn document_tags(&self, id: &DocumentId) -> Result<Vec<String>, Self::Error>;
}

/// Reads and idempotently rewrites a document's tags and free-text field
///
/// Writes are staged per document and become visible together on
/// [`DocumentStore::commit`].
///
/// Implemented by the infrastructure layer (tagwright-store)
pub trait DocumentStore {
    /// Error type for store operations
    type Error;

    /// Load the raw text material of a document, `None` if it does not exist
    fn context(&self, id: &DocumentId) -> Result<Option<DocumentContext>, Self::Error>;

    /// Committed tags of a document
    fn tags(&self, id: &DocumentId) -> Result<Vec<String>, Self::Error>;

    /// Stage a tag for insertion
    fn add_tag(&mut self, id: &DocumentId, tag: &str) -> Result<(), Self::Error>;

    /// Committed free-text field of a document
    fn extra(&self, id: &DocumentId) -> Result<String, Self::Error>;

    /// Stage a new free-text field value
    fn set_extra(&mut self, id: &DocumentId, extra: &str) -> Result<(), Self::Error>;

    /// Atomically apply every staged change for a document
    fn commit(&mut self, id: &DocumentId) -> Result<(), Self::Error>;

    /// Drop staged changes for a document without applying them
    fn discard(&mut self, id: &DocumentId);
}
