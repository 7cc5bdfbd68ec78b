//! OpenAI-compatible chat completions provider
//!
//! Talks to any endpoint implementing `POST {base_url}/chat/completions`
//! (DeepSeek, OpenAI, OpenRouter, local gateways).
//!
//! # Examples
//!
//! ```no_run
//! use tagwright_llm::{ChatCompletionsProvider, ProviderConfig};
//!
//! let config = ProviderConfig {
//!     api_key: Some("sk-...".to_string()),
//!     ..ProviderConfig::default()
//! };
//! let provider = ChatCompletionsProvider::new(config).unwrap();
//! ```

use crate::{ChatMessage, ChatProvider, LlmError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Default model
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default timeout for a single request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "TAGWRIGHT_API_KEY";

/// Connection settings for a chat completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Fill a missing API key from the environment
    pub fn with_env_fallback(mut self) -> Self {
        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            self.api_key = std::env::var(API_KEY_ENV).ok();
        }
        self
    }

    /// Check that usable credentials are present
    ///
    /// A missing, blank, or placeholder key (`YOUR_..._HERE`, `<...>`) is
    /// rejected.
    pub fn validate(&self) -> Result<&str, LlmError> {
        let key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LlmError::MissingCredentials(format!("set provider.api_key or {}", API_KEY_ENV))
            })?;

        let upper = key.to_uppercase();
        if (upper.starts_with("YOUR_") && upper.ends_with("_HERE")) || key.starts_with('<') {
            return Err(LlmError::MissingCredentials(
                "API key is still a placeholder".to_string(),
            ));
        }
        Ok(key)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatMessage],
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat provider for OpenAI-compatible APIs
///
/// Performs exactly one HTTP request per call; retrying is the caller's
/// business.
pub struct ChatCompletionsProvider {
    url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    /// Create a provider, failing fast on missing credentials
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        let api_key = config.validate()?.to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model,
            client,
        })
    }
}

#[async_trait]
impl ChatProvider for ChatCompletionsProvider {
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            temperature,
            messages,
        };

        debug!("POST {} ({} messages)", self.url, messages.len());

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
