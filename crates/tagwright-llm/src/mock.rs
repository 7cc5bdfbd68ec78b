//! Scripted mock provider for deterministic testing

use crate::{ChatMessage, ChatProvider, LlmError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

#[derive(Debug, Default)]
struct MockState {
    rules: Vec<(String, MockReply)>,
    requests: Vec<Vec<ChatMessage>>,
}

/// Mock chat provider that never touches the network
///
/// Replies are chosen by the first rule whose needle occurs anywhere in the
/// request's messages, in the order rules were added; requests matching no
/// rule get the default response. Clones share state, so a test can keep a
/// handle while the pipeline owns another.
///
/// # Examples
///
/// ```
/// use tagwright_llm::{ChatMessage, ChatProvider, MockProvider};
///
/// # async fn example() {
/// let mut provider = MockProvider::default();
/// provider.add_response("Summarize now", "- a bullet");
/// provider.add_error("broken");
///
/// let reply = provider.chat(&[ChatMessage::user("Summarize now.")], 0.2).await;
/// assert_eq!(reply.unwrap(), "- a bullet");
/// assert!(provider.chat(&[ChatMessage::user("broken doc")], 0.2).await.is_err());
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Reply with `response` to requests containing `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.lock()
            .rules
            .push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail requests containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.lock().rules.push((needle.into(), MockReply::Error));
    }

    /// Get the number of times chat was called
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.lock().requests.clone()
    }

    /// Reset the request log
    pub fn reset_call_count(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn chat(&self, messages: &[ChatMessage], _temperature: f32) -> Result<String, LlmError> {
        let mut state = self.lock();
        state.requests.push(messages.to_vec());

        let reply = state
            .rules
            .iter()
            .find(|(needle, _)| messages.iter().any(|m| m.content.contains(needle.as_str())))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
