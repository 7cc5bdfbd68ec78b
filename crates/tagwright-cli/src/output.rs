//! Output formatting for the CLI.

use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tagwright_domain::FieldValue;
use tagwright_extractor::{BatchReport, DocumentOutcome, FieldFrequencyTable};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a batch report as a per-document table plus a summary line.
    pub fn format_report(&self, report: &BatchReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Document", "Outcome", "Details"]);

        for doc in &report.documents {
            let (outcome, details) = match &doc.outcome {
                DocumentOutcome::Succeeded(write) => (
                    self.colorize("ok", "green"),
                    format!(
                        "{} tag(s) added{}{}",
                        write.tags_added.len(),
                        if write.tags_failed > 0 {
                            format!(", {} rejected", write.tags_failed)
                        } else {
                            String::new()
                        },
                        if write.extra_changed { ", annotation updated" } else { "" }
                    ),
                ),
                DocumentOutcome::Skipped(reason) => {
                    (self.colorize("skipped", "yellow"), reason.to_string())
                }
                DocumentOutcome::Failed(error) => (self.colorize("failed", "red"), error.clone()),
            };
            builder.push_record([doc.id.to_string(), outcome, details]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let summary = if report.failed > 0 {
            self.warning(&report.summary())
        } else {
            self.success(&report.summary())
        };
        format!("{}\n{}", table, summary)
    }

    /// Format the vocabulary as a table of field, value and count.
    ///
    /// Rows follow the frequency ranking within each field.
    pub fn format_vocabulary(&self, table: &FieldFrequencyTable, field: Option<&str>) -> String {
        let keys: Vec<&str> = table
            .keys()
            .filter(|key| field.map_or(true, |wanted| wanted == *key))
            .collect();
        if keys.is_empty() {
            return self.colorize("No structured tags found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value", "Count"]);
        for key in keys {
            for (value, count) in table.ranked(key) {
                builder.push_record([key.to_string(), value.to_string(), count.to_string()]);
            }
        }

        let mut rendered = builder.build();
        rendered
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!(
            "{}\n{}",
            rendered,
            self.info(&format!("{} structured tag(s)", table.total()))
        )
    }

    /// Format a document's tags and annotation fields.
    pub fn format_document(
        &self,
        key: &str,
        title: &str,
        tags: &[String],
        fields: &[(String, FieldValue)],
    ) -> String {
        let mut out = format!("{} {}\n", self.colorize(key, "cyan"), title);

        out.push_str("\nTags:\n");
        if tags.is_empty() {
            out.push_str("  (none)\n");
        }
        for tag in tags {
            out.push_str(&format!("  {}\n", tag));
        }

        out.push_str("\nAnnotation:\n");
        if fields.is_empty() {
            out.push_str("  (none)\n");
        }
        for (name, value) in fields {
            let values: Vec<&str> = value.values().collect();
            out.push_str(&format!("  {}: {}\n", name, values.join(", ")));
        }
        out
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
