//! Tagwright Storage Layer
//!
//! Implements the `DocumentStore` and `TagSource` traits on top of a SQLite
//! library database.
//!
//! # Architecture
//!
//! - `documents`, `attachments`, `notes` and `tags` tables (see `schema.sql`)
//! - Tag and free-text edits are staged in memory per document and applied in
//!   a single transaction on `commit`
//!
//! # Examples
//!
//! ```no_run
//! use tagwright_store::{NewDocument, SqliteLibrary};
//!
//! let mut library = SqliteLibrary::new("library.sqlite").unwrap();
//! library.insert_document(&NewDocument::regular("ABCD1234", "A paper")).unwrap();
//! ```

#![warn(missing_docs)]

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use tagwright_domain::traits::{DocumentStore, TagSource};
use tagwright_domain::{DocumentContext, DocumentId, DocumentKind};
use thiserror::Error;
use tracing::debug;

/// Content type whose attachment text is used as document full text
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Maximum accepted tag length (characters)
pub const MAX_TAG_LENGTH: usize = 255;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Tag rejected before insertion
    #[error("Invalid tag {tag:?}: {reason}")]
    InvalidTag {
        /// Offending tag
        tag: String,
        /// Why it was rejected
        reason: String,
    },

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// A document to insert into the library
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Document key
    pub key: String,
    /// Item kind
    pub kind: DocumentKind,
    /// Title
    pub title: String,
    /// Abstract
    pub abstract_note: String,
    /// Free-text field
    pub extra: String,
}

impl NewDocument {
    /// A regular item with only a title
    pub fn regular(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: DocumentKind::Regular,
            title: title.into(),
            abstract_note: String::new(),
            extra: String::new(),
        }
    }

    /// Set the abstract
    pub fn with_abstract(mut self, abstract_note: impl Into<String>) -> Self {
        self.abstract_note = abstract_note.into();
        self
    }

    /// Set the free-text field
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    /// Set the item kind
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Changes staged for one document
#[derive(Debug, Default)]
struct PendingEdit {
    tags: Vec<String>,
    extra: Option<String>,
}

/// SQLite-backed document library
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteLibrary instance.
pub struct SqliteLibrary {
    conn: Connection,
    pending: HashMap<DocumentId, PendingEdit>,
}

impl SqliteLibrary {
    /// Open (or create) a library at the given path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut library = Self {
            conn,
            pending: HashMap::new(),
        };
        library.initialize_schema()?;
        Ok(library)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Insert a document
    pub fn insert_document(&mut self, document: &NewDocument) -> Result<DocumentId, StoreError> {
        self.conn.execute(
            "INSERT INTO documents (key, kind, title, abstract_note, extra) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &document.key,
                document.kind.as_str(),
                &document.title,
                &document.abstract_note,
                &document.extra,
            ],
        )?;
        Ok(DocumentId::new(document.key.clone()))
    }

    /// Attach extracted text to a document
    pub fn add_attachment(
        &mut self,
        id: &DocumentId,
        content_type: &str,
        full_text: &str,
    ) -> Result<(), StoreError> {
        self.ensure_exists(id)?;
        self.conn.execute(
            "INSERT INTO attachments (document_key, content_type, full_text) VALUES (?1, ?2, ?3)",
            params![id.as_str(), content_type, full_text],
        )?;
        Ok(())
    }

    /// Add a child note to a document
    pub fn add_note(&mut self, id: &DocumentId, body: &str) -> Result<(), StoreError> {
        self.ensure_exists(id)?;
        self.conn.execute(
            "INSERT INTO notes (document_key, body) VALUES (?1, ?2)",
            params![id.as_str(), body],
        )?;
        Ok(())
    }

    /// Insert tags immediately, bypassing staging
    pub fn insert_tags(&mut self, id: &DocumentId, tags: &[&str]) -> Result<(), StoreError> {
        self.ensure_exists(id)?;
        let tx = self.conn.transaction()?;
        for tag in tags {
            tx.execute(
                "INSERT OR IGNORE INTO tags (document_key, name) VALUES (?1, ?2)",
                params![id.as_str(), tag],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Ids of every regular document, ordered by key
    pub fn regular_document_ids(&self) -> Result<Vec<DocumentId>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM documents WHERE kind = ?1 ORDER BY key")?;
        let ids = stmt
            .query_map(params![DocumentKind::Regular.as_str()], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids.into_iter().map(DocumentId::new).collect())
    }

    /// Whether a document has staged, uncommitted changes
    pub fn has_pending(&self, id: &DocumentId) -> bool {
        self.pending.contains_key(id)
    }

    fn exists(&self, id: &DocumentId) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM documents WHERE key = ?1",
                params![id.as_str()],
                |_| Ok(true),
            )
            .optional()?;
        Ok(found.unwrap_or(false))
    }

    fn ensure_exists(&self, id: &DocumentId) -> Result<(), StoreError> {
        if self.exists(id)? {
            Ok(())
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    fn query_strings(&self, sql: &str, id: &DocumentId) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![id.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn validate_tag(tag: &str) -> Result<(), StoreError> {
    let reason = if tag.trim().is_empty() {
        Some("tag is empty")
    } else if tag.contains('\n') || tag.contains('\r') {
        Some("tag contains a line break")
    } else if tag.chars().count() > MAX_TAG_LENGTH {
        Some("tag is too long")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidTag {
            tag: tag.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

impl TagSource for SqliteLibrary {
    type Error = StoreError;

    fn all_tags(&self) -> Result<Vec<String>, Self::Error> {
        let mut stmt = self.conn.prepare("SELECT name FROM tags ORDER BY id")?;
        let tags = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn document_ids(&self) -> Result<Vec<DocumentId>, Self::Error> {
        let mut stmt = self.conn.prepare("SELECT key FROM documents ORDER BY key")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids.into_iter().map(DocumentId::new).collect())
    }

    fn document_tags(&self, id: &DocumentId) -> Result<Vec<String>, Self::Error> {
        self.tags(id)
    }
}

impl DocumentStore for SqliteLibrary {
    type Error = StoreError;

    fn context(&self, id: &DocumentId) -> Result<Option<DocumentContext>, Self::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT kind, title, abstract_note, extra FROM documents WHERE key = ?1",
                params![id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((kind, title, abstract_note, extra)) = row else {
            return Ok(None);
        };

        let kind = DocumentKind::parse(&kind)
            .ok_or_else(|| StoreError::InvalidData(format!("Unknown document kind: {}", kind)))?;

        let mut stmt = self.conn.prepare(
            "SELECT full_text FROM attachments
             WHERE document_key = ?1 AND lower(content_type) = ?2 ORDER BY id",
        )?;
        let full_texts = stmt
            .query_map(params![id.as_str(), PDF_CONTENT_TYPE], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let notes = self.query_strings(
            "SELECT body FROM notes WHERE document_key = ?1 ORDER BY id",
            id,
        )?;

        Ok(Some(DocumentContext {
            kind,
            title,
            abstract_note,
            full_texts,
            notes,
            extra,
        }))
    }

    fn tags(&self, id: &DocumentId) -> Result<Vec<String>, Self::Error> {
        self.query_strings(
            "SELECT name FROM tags WHERE document_key = ?1 ORDER BY id",
            id,
        )
    }

    fn add_tag(&mut self, id: &DocumentId, tag: &str) -> Result<(), Self::Error> {
        validate_tag(tag)?;
        self.ensure_exists(id)?;
        self.pending
            .entry(id.clone())
            .or_default()
            .tags
            .push(tag.to_string());
        Ok(())
    }

    fn extra(&self, id: &DocumentId) -> Result<String, Self::Error> {
        self.conn
            .query_row(
                "SELECT extra FROM documents WHERE key = ?1",
                params![id.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn set_extra(&mut self, id: &DocumentId, extra: &str) -> Result<(), Self::Error> {
        self.ensure_exists(id)?;
        self.pending.entry(id.clone()).or_default().extra = Some(extra.to_string());
        Ok(())
    }

    fn commit(&mut self, id: &DocumentId) -> Result<(), Self::Error> {
        let Some(edit) = self.pending.remove(id) else {
            return Ok(());
        };

        let tx = self.conn.transaction()?;
        for tag in &edit.tags {
            tx.execute(
                "INSERT OR IGNORE INTO tags (document_key, name) VALUES (?1, ?2)",
                params![id.as_str(), tag],
            )?;
        }
        if let Some(extra) = &edit.extra {
            let updated = tx.execute(
                "UPDATE documents SET extra = ?1 WHERE key = ?2",
                params![extra, id.as_str()],
            )?;
            if updated == 0 {
                return Err(StoreError::NotFound(id.to_string()));
            }
        }
        tx.commit()?;

        debug!(
            "Committed {} tag(s){} for {}",
            edit.tags.len(),
            if edit.extra.is_some() { " and extra" } else { "" },
            id
        );
        Ok(())
    }

    fn discard(&mut self, id: &DocumentId) {
        self.pending.remove(id);
    }
}
