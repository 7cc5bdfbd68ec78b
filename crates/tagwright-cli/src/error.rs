//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Library database error
    #[error("Library error: {0}")]
    Store(#[from] tagwright_store::StoreError),

    /// Chat provider error (including missing credentials)
    #[error("Provider error: {0}")]
    Llm(#[from] tagwright_llm::LlmError),

    /// Extraction error
    #[error("Extraction error: {0}")]
    Extractor(#[from] tagwright_extractor::ExtractorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Document not found in the library
    #[error("Document not found: {0}")]
    NotFound(String),
}
