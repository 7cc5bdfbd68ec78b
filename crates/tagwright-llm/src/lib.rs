//! Tagwright LLM Provider Layer
//!
//! Pluggable chat-completion providers behind a single async trait.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scripted mock for testing
//! - `ChatCompletionsProvider`: Any OpenAI-compatible `/chat/completions` API
//!
//! # Examples
//!
//! ```
//! use tagwright_llm::{ChatMessage, ChatProvider, MockProvider};
//!
//! # async fn example() -> Result<(), tagwright_llm::LlmError> {
//! let provider = MockProvider::new("Hello from LLM!");
//! let reply = provider
//!     .chat(&[ChatMessage::user("test prompt")], 0.1)
//!     .await?;
//! assert_eq!(reply, "Hello from LLM!");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use chat::{ChatCompletionsProvider, ProviderConfig};
pub use mock::MockProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or transport error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Response arrived but carried no text
    #[error("Model returned empty content")]
    EmptyContent,

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credentials missing or left at a placeholder
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standing instructions
    System,
    /// Request content
    User,
    /// Model output
    Assistant,
}

/// A single role-tagged chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Text-generation collaborator
///
/// Accepts an ordered list of role-tagged messages and a sampling temperature
/// and returns the generated text.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a reply to `messages`
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError>;

    /// Name of the model answering requests
    fn model_name(&self) -> &str;
}
