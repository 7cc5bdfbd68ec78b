//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for vocabulary guide synthesis, extraction and normalization
///
/// Built once at startup and passed by reference into every component; never
/// mutated during a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum number of extended (non-core) fields kept per record
    pub max_extended_fields: usize,

    /// Structured tag count above which the guide is truncated per field
    pub huge_corpus_threshold: usize,

    /// Values kept per field when the corpus is huge
    pub per_field_cap: usize,

    /// Show `(count)` after each value in the guide
    pub include_counts: bool,

    /// Sampling temperature for the summarize stage
    pub summary_temperature: f32,

    /// Sampling temperature for the extract stage
    pub extraction_temperature: f32,

    /// Delay before the single whole-pipeline retry (milliseconds)
    pub retry_delay_ms: u64,

    /// Maximum time for a single stage call (seconds)
    pub stage_timeout_secs: u64,

    /// Include attachment full text in the context
    pub use_fulltext: bool,

    /// Maximum full text length after cleaning (characters)
    pub max_fulltext_chars: usize,

    /// Include child notes in the context
    pub use_notes: bool,

    /// Maximum combined note length (characters)
    pub max_notes_chars: usize,
}

impl ExtractorConfig {
    /// Get the retry delay as a Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Get the stage timeout as a Duration
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.per_field_cap == 0 {
            return Err("per_field_cap must be greater than 0".to_string());
        }
        if self.stage_timeout_secs == 0 {
            return Err("stage_timeout_secs must be greater than 0".to_string());
        }
        for (name, value) in [
            ("summary_temperature", self.summary_temperature),
            ("extraction_temperature", self.extraction_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(format!("{} {} out of range [0.0, 2.0]", name, value));
            }
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_extended_fields: 3,
            huge_corpus_threshold: 1500,
            per_field_cap: 400,
            include_counts: true,
            summary_temperature: 0.2,
            extraction_temperature: 0.1,
            retry_delay_ms: 600,
            stage_timeout_secs: 180,
            use_fulltext: true,
            max_fulltext_chars: 80_000,
            use_notes: true,
            max_notes_chars: 8_000,
        }
    }
}

impl ExtractorConfig {
    /// Compact preset: smaller contexts and guides for small-context models
    pub fn compact() -> Self {
        Self {
            huge_corpus_threshold: 300,
            per_field_cap: 50,
            max_fulltext_chars: 20_000,
            max_notes_chars: 2_000,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
