//! Tagwright Domain Layer
//!
//! Core vocabulary and trait interfaces shared by every other Tagwright crate.
//! Like the rest of the domain layer it has no external dependencies.
//!
//! ## Key Concepts
//!
//! - **Structured tag**: a plain document tag of the form `key:value` that
//!   encodes one metadata field value
//! - **Core field**: one of the fixed, always-recognized metadata fields
//! - **Normalized record**: validated extraction output, core fields plus a
//!   count-bounded set of extended fields
//! - **Document**: an item in the host library, owned by an external store
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Infrastructure implementations (SQLite library, LLM clients) live in
//!   other crates and plug in through the traits in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod field;
pub mod record;
pub mod tag;
pub mod traits;

// Re-exports for convenience
pub use document::{DocumentContext, DocumentId, DocumentKind};
pub use field::{CoreField, FieldValue};
pub use record::NormalizedRecord;
pub use tag::StructuredTag;
