//! Documents as seen from the extraction side

use std::fmt;

/// Key of a document in the host library
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document id from its key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Kind of library item
///
/// Only regular items carry bibliographic metadata; attachments and
/// standalone notes are never sent through extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Regular bibliographic item
    Regular,
    /// File attachment
    Attachment,
    /// Standalone note
    Note,
}

impl DocumentKind {
    /// Get the kind name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Regular => "regular",
            DocumentKind::Attachment => "attachment",
            DocumentKind::Note => "note",
        }
    }

    /// Parse a kind from its stored name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "regular" => Some(DocumentKind::Regular),
            "attachment" => Some(DocumentKind::Attachment),
            "note" => Some(DocumentKind::Note),
            _ => None,
        }
    }
}

/// Raw text material for one document
///
/// Sources are kept separate here; length capping and concatenation into a
/// single prompt context happen on the extraction side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    /// Item kind
    pub kind: DocumentKind,

    /// Title field
    pub title: String,

    /// Abstract field
    pub abstract_note: String,

    /// Extracted full text, one entry per attachment
    pub full_texts: Vec<String>,

    /// Child note bodies (may contain HTML)
    pub notes: Vec<String>,

    /// Current free-text field content
    pub extra: String,
}

impl DocumentContext {
    /// Create an empty context for a regular item
    pub fn regular(title: impl Into<String>) -> Self {
        Self {
            kind: DocumentKind::Regular,
            title: title.into(),
            abstract_note: String::new(),
            full_texts: Vec::new(),
            notes: Vec::new(),
            extra: String::new(),
        }
    }

    /// Whether the context carries no text at all
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
            && self.abstract_note.trim().is_empty()
            && self.full_texts.iter().all(|t| t.trim().is_empty())
            && self.notes.iter().all(|n| n.trim().is_empty())
            && self.extra.trim().is_empty()
    }
}
