//! Tagwright Extractor
//!
//! Turns free-form document text into normalized `key:value` tags and an
//! annotation block, while steering every new extraction toward the tag
//! vocabulary the corpus already uses.
//!
//! # Architecture
//!
//! ```text
//! corpus tags → FieldFrequencyTable → VocabularyGuide ─┐
//!                                                       ▼
//! document → context → summarize → extract → Normalizer → write-back
//! ```
//!
//! # Key Features
//!
//! - **Vocabulary Indexing**: Frequency table of every structured tag in the corpus
//! - **Guide Synthesis**: Bounded, frequency-ranked prompt section per field
//! - **Two-Stage Extraction**: Summary first, then a strict JSON object, retried once
//! - **Output Recovery**: Code-fenced or chatty JSON is still accepted
//! - **Idempotent Write-Back**: Tag union plus in-place annotation block upsert
//!
//! # Example Usage
//!
//! ```no_run
//! use tagwright_domain::DocumentId;
//! use tagwright_extractor::{BatchRunner, ExtractorConfig};
//! use tagwright_llm::MockProvider;
//! use tagwright_store::SqliteLibrary;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"{"task": ["locomotion"]}"#);
//! let library = SqliteLibrary::new("library.sqlite")?;
//!
//! let mut runner = BatchRunner::new(provider, library, ExtractorConfig::default())?;
//! let report = runner.run(&[DocumentId::from("ABCD1234")]).await?;
//!
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod annotation;
mod batch;
mod config;
mod context;
mod error;
mod guide;
mod institution;
mod normalizer;
mod parser;
mod pipeline;
mod prompt;
mod retry;
mod vocabulary;
mod writer;


pub use annotation::{
    parse_field, read_fields, render_block, render_content, upsert, AnnotatedField,
    BLOCK_DELIMITER, BLOCK_MARKER,
};
pub use batch::{BatchReport, BatchRunner, DocumentOutcome, DocumentReport, SkipReason};
pub use config::ExtractorConfig;
pub use context::{clean_full_text, clean_note, render_context};
pub use error::ExtractorError;
pub use guide::VocabularyGuide;
pub use institution::canonicalize_institution;
pub use normalizer::Normalizer;
pub use parser::{parse_extraction, ExtractionResult};
pub use pipeline::ExtractionPipeline;
pub use prompt::{extract_messages, summarize_messages};
pub use retry::retry_once;
pub use vocabulary::{enumerate_tags, parse_structured_tag, FieldFrequencyTable};
pub use writer::{write_back, WriteOutcome};
