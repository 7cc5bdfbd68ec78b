//! Error types for the Extractor

use tagwright_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Text-generation collaborator error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Document store error
    #[error("Store error: {0}")]
    Store(String),

    /// A stage exceeded its time budget
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),

    /// Model output could not be turned into a JSON object
    #[error("Invalid model output: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Batch started with no documents
    #[error("No documents to process")]
    EmptyBatch,

    /// Document does not exist in the store
    #[error("Document not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
