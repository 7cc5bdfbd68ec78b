//! Sequential batch processing over a document store

use crate::config::ExtractorConfig;
use crate::context::render_context;
use crate::error::ExtractorError;
use crate::guide::VocabularyGuide;
use crate::normalizer::Normalizer;
use crate::pipeline::ExtractionPipeline;
use crate::vocabulary::FieldFrequencyTable;
use crate::writer::{write_back, WriteOutcome};
use std::fmt::{self, Display};
use tagwright_domain::traits::{DocumentStore, TagSource};
use tagwright_domain::{DocumentId, DocumentKind};
use tagwright_llm::ChatProvider;
use tracing::{debug, info, warn};

/// Why a document was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Attachment or standalone note
    NotRegular,
    /// No text to extract from
    EmptyContext,
    /// Extraction produced no usable field
    NothingExtracted,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::NotRegular => "not a regular item",
            SkipReason::EmptyContext => "no text",
            SkipReason::NothingExtracted => "nothing extracted",
        })
    }
}

/// Result of processing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Record written back
    Succeeded(WriteOutcome),
    /// Nothing to do
    Skipped(SkipReason),
    /// Terminal failure for this document
    Failed(String),
}

/// Per-document entry of a batch report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    /// Document processed
    pub id: DocumentId,
    /// What happened to it
    pub outcome: DocumentOutcome,
}

/// Outcome counts and details for a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Documents written back
    pub succeeded: usize,
    /// Documents skipped
    pub skipped: usize,
    /// Documents that failed
    pub failed: usize,
    /// Per-document outcomes in processing order
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    fn record(&mut self, id: DocumentId, outcome: DocumentOutcome) {
        match &outcome {
            DocumentOutcome::Succeeded(_) => self.succeeded += 1,
            DocumentOutcome::Skipped(_) => self.skipped += 1,
            DocumentOutcome::Failed(_) => self.failed += 1,
        }
        self.documents.push(DocumentReport { id, outcome });
    }

    /// Number of documents processed
    pub fn total(&self) -> usize {
        self.documents.len()
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Done: {} succeeded, {} skipped, {} failed",
            self.succeeded, self.skipped, self.failed
        )
    }
}

/// Runs extraction and write-back over an explicit list of documents
///
/// Documents are handled one at a time. The vocabulary guide is built once
/// per batch before the first document and never changes during the batch.
pub struct BatchRunner<P, S> {
    pipeline: ExtractionPipeline<P>,
    normalizer: Normalizer,
    store: S,
}

impl<P, S> BatchRunner<P, S>
where
    P: ChatProvider,
    S: DocumentStore + TagSource,
    <S as DocumentStore>::Error: Display,
    <S as TagSource>::Error: Display,
{
    /// Create a runner, validating the configuration
    pub fn new(provider: P, store: S, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            normalizer: Normalizer::new(config.max_extended_fields),
            pipeline: ExtractionPipeline::new(provider, config),
            store,
        })
    }

    /// Get the document store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take back the document store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Build the vocabulary guide from the store's current tags
    pub fn build_guide(&self) -> VocabularyGuide {
        let table = FieldFrequencyTable::load(&self.store);
        VocabularyGuide::render(&table, self.pipeline.config())
    }

    /// Process every document in `ids`
    ///
    /// Fails only for an empty list; per-document problems are recorded in
    /// the report and the batch carries on.
    pub async fn run(&mut self, ids: &[DocumentId]) -> Result<BatchReport, ExtractorError> {
        if ids.is_empty() {
            return Err(ExtractorError::EmptyBatch);
        }

        info!(
            "Processing {} documents with {}",
            ids.len(),
            self.pipeline.provider().model_name()
        );
        let guide = self.build_guide();
        debug!("Vocabulary guide: {} chars", guide.as_str().len());

        let mut report = BatchReport::default();
        for id in ids {
            let outcome = match self.process(id, &guide).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Document {} failed: {}", id, e);
                    DocumentOutcome::Failed(e.to_string())
                }
            };
            match &outcome {
                DocumentOutcome::Succeeded(write) => info!(
                    "Document {}: {} tags added, annotation {}",
                    id,
                    write.tags_added.len(),
                    if write.extra_changed { "updated" } else { "unchanged" }
                ),
                DocumentOutcome::Skipped(reason) => info!("Document {} skipped: {}", id, reason),
                DocumentOutcome::Failed(_) => {}
            }
            report.record(id.clone(), outcome);
        }

        info!("{}", report.summary());
        Ok(report)
    }

    /// Process a single document against a prebuilt guide
    pub async fn process(
        &mut self,
        id: &DocumentId,
        guide: &VocabularyGuide,
    ) -> Result<DocumentOutcome, ExtractorError> {
        let doc = self
            .store
            .context(id)
            .map_err(|e| ExtractorError::Store(e.to_string()))?
            .ok_or_else(|| ExtractorError::NotFound(id.to_string()))?;

        if doc.kind != DocumentKind::Regular {
            return Ok(DocumentOutcome::Skipped(SkipReason::NotRegular));
        }
        if doc.is_blank() {
            return Ok(DocumentOutcome::Skipped(SkipReason::EmptyContext));
        }

        // Sources can all be disabled by configuration
        let context = render_context(&doc, self.pipeline.config());
        if context.is_empty() {
            return Ok(DocumentOutcome::Skipped(SkipReason::EmptyContext));
        }

        let raw = self.pipeline.run(&context, guide).await?;
        let record = self.normalizer.normalize(&raw);
        if record.is_empty() {
            return Ok(DocumentOutcome::Skipped(SkipReason::NothingExtracted));
        }

        let written = write_back(&mut self.store, id, &record)?;
        Ok(DocumentOutcome::Succeeded(written))
    }
}
