//! Two-stage extraction pipeline

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::guide::VocabularyGuide;
use crate::parser::{parse_extraction, ExtractionResult};
use crate::prompt;
use crate::retry::retry_once;
use std::future::Future;
use std::time::Duration;
use tagwright_llm::{ChatMessage, ChatProvider, LlmError};
use tracing::debug;

/// Summarize-then-extract pipeline over a chat provider
pub struct ExtractionPipeline<P> {
    provider: P,
    config: ExtractorConfig,
}

impl<P: ChatProvider> ExtractionPipeline<P> {
    /// Create a new pipeline
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Get the chat provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get the configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract a raw result from a document context
    ///
    /// Both stages run in order; if either fails, the whole pair is retried
    /// once after the configured delay.
    pub async fn run(
        &self,
        context: &str,
        guide: &VocabularyGuide,
    ) -> Result<ExtractionResult, ExtractorError> {
        retry_once(self.config.retry_delay(), "Extraction", move || {
            self.run_once(context, guide)
        })
        .await
    }

    /// Run both stages once, without retrying
    pub async fn run_once(
        &self,
        context: &str,
        guide: &VocabularyGuide,
    ) -> Result<ExtractionResult, ExtractorError> {
        let summary = self.summarize(context).await?;
        self.extract(&summary, guide).await
    }

    /// Stage 1: condense the context into a short bullet summary
    pub async fn summarize(&self, context: &str) -> Result<String, ExtractorError> {
        let messages = prompt::summarize_messages(context);
        let summary = self
            .chat(&messages, self.config.summary_temperature)
            .await?;
        debug!("Summary: {} chars", summary.len());
        Ok(summary)
    }

    /// Stage 2: turn a summary into a JSON object of fields
    pub async fn extract(
        &self,
        summary: &str,
        guide: &VocabularyGuide,
    ) -> Result<ExtractionResult, ExtractorError> {
        let messages = prompt::extract_messages(summary, guide, self.config.max_extended_fields);
        let response = self
            .chat(&messages, self.config.extraction_temperature)
            .await?;
        parse_extraction(&response)
    }

    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, ExtractorError> {
        let text = with_timeout(
            self.config.stage_timeout(),
            self.provider.chat(messages, temperature),
        )
        .await??;
        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent.into());
        }
        Ok(text)
    }
}

async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = T>,
) -> Result<T, ExtractorError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| ExtractorError::Timeout(limit.as_secs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tagwright_llm::MockProvider;

    fn config() -> ExtractorConfig {
        ExtractorConfig {
            retry_delay_ms: 0,
            ..ExtractorConfig::default()
        }
    }

    fn scripted(extraction: &str) -> MockProvider {
        let mut provider = MockProvider::default();
        provider.add_response("Summarize now", "- humanoid parkour");
        provider.add_response("Summary:", extraction);
        provider
    }

    #[tokio::test]
    async fn test_two_stages_in_order() {
        let provider = scripted(r#"{"task": ["parkour"]}"#);
        let pipeline = ExtractionPipeline::new(provider.clone(), config());

        let result = pipeline.run("Title: Parkour", &VocabularyGuide::default()).await.unwrap();
        assert_eq!(result["task"], json!(["parkour"]));

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0][1].content.contains("Title: Parkour"));
        assert!(requests[1][1].content.contains("- humanoid parkour"));
    }

    #[tokio::test]
    async fn test_fenced_output_recovered() {
        let provider = scripted("```json\n{\"robot_type\": \"humanoid\"}\n```");
        let pipeline = ExtractionPipeline::new(provider.clone(), config());

        let result = pipeline.run("ctx", &VocabularyGuide::default()).await.unwrap();
        assert_eq!(result["robot_type"], json!("humanoid"));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unparsable_output_retried_then_fails() {
        let provider = scripted("I cannot help with that.");
        let pipeline = ExtractionPipeline::new(provider.clone(), config());

        let result = pipeline.run("ctx", &VocabularyGuide::default()).await;
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_transport_error_skips_extract_stage() {
        let mut provider = MockProvider::default();
        provider.add_error("Summarize now");
        let pipeline = ExtractionPipeline::new(provider.clone(), config());

        let result = pipeline.run("ctx", &VocabularyGuide::default()).await;
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_blank_reply_is_failure() {
        let provider = scripted("   ");
        let pipeline = ExtractionPipeline::new(provider, config());

        let result = pipeline.run_once("ctx", &VocabularyGuide::default()).await;
        assert!(matches!(result, Err(ExtractorError::Llm(LlmError::EmptyContent))));
    }

    struct StalledProvider;

    #[async_trait]
    impl ChatProvider for StalledProvider {
        async fn chat(&self, _messages: &[ChatMessage], _temperature: f32) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }

        fn model_name(&self) -> &str {
            "stalled"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stage_timeout() {
        let pipeline = ExtractionPipeline::new(StalledProvider, config());
        let result = pipeline.summarize("ctx").await;
        assert!(matches!(result, Err(ExtractorError::Timeout(180))));
    }
}
