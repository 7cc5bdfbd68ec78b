//! Vocabulary guide rendering
//!
//! Turns the corpus frequency table into prompt text that nudges new
//! extractions toward the dominant existing spelling of each value.

use crate::config::ExtractorConfig;
use crate::vocabulary::FieldFrequencyTable;
use tagwright_domain::CoreField;

const GUIDE_INSTRUCTIONS: &str = "Use the existing structured tags to standardize your output.
- Reuse an existing tag if your candidate is semantically equivalent.
- Prefer the most frequent variant (highest count).
- Do NOT invent near-duplicates; snap to the closest existing tag form.
- Keep keys as provided (e.g., method_name/task/robot_type/...).";

/// Rendered, read-only vocabulary guide
///
/// Deterministic for a given table and configuration. An empty guide means
/// the corpus has no structured tags and is left out of prompts entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyGuide {
    text: String,
}

impl VocabularyGuide {
    /// Render the guide for `table`
    pub fn render(table: &FieldFrequencyTable, config: &ExtractorConfig) -> Self {
        let huge = table.total() > config.huge_corpus_threshold;

        let sections: Vec<String> = ordered_keys(table)
            .into_iter()
            .filter_map(|key| {
                let ranked = table.ranked(key);
                let limit = if huge { config.per_field_cap } else { ranked.len() };
                let lines: Vec<String> = ranked
                    .into_iter()
                    .take(limit)
                    .map(|(value, count)| {
                        if config.include_counts {
                            format!("- {} ({})", value, count)
                        } else {
                            format!("- {}", value)
                        }
                    })
                    .collect();

                if lines.is_empty() {
                    None
                } else {
                    Some(format!("Existing {} tags:\n{}", key, lines.join("\n")))
                }
            })
            .collect();

        if sections.is_empty() {
            return Self::default();
        }

        Self {
            text: format!("{}\n\n{}", GUIDE_INSTRUCTIONS, sections.join("\n\n")),
        }
    }

    /// Guide text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Core field keys in canonical order, then every other key alphabetically
fn ordered_keys(table: &FieldFrequencyTable) -> Vec<&str> {
    let mut keys: Vec<&str> = CoreField::ALL
        .iter()
        .map(CoreField::as_str)
        .filter(|core| table.keys().any(|key| key == *core))
        .collect();
    keys.extend(table.keys().filter(|key| CoreField::parse(key).is_none()));
    keys
}
