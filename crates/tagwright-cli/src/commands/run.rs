//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use tagwright_domain::DocumentId;
use tagwright_extractor::{BatchReport, BatchRunner, ExtractorConfig};
use tagwright_llm::{ChatCompletionsProvider, ChatProvider};
use tagwright_store::SqliteLibrary;
use tracing::info;

/// Execute the run command.
pub async fn execute_run(
    args: RunArgs,
    config: &Config,
    library: SqliteLibrary,
    formatter: &Formatter,
) -> Result<()> {
    let ids = select_documents(&args, &library)?;

    let mut provider_config = config.provider.clone();
    if let Some(api_key) = args.api_key {
        provider_config.api_key = Some(api_key);
    }
    if let Some(model) = args.model {
        provider_config.model = model;
    }

    // Fails on missing or placeholder credentials before anything is processed
    let provider = ChatCompletionsProvider::new(provider_config.with_env_fallback())?;
    info!("Using model {}", provider.model_name());

    let report = run_batch(provider, library, config.extractor.clone(), &ids).await?;
    println!("{}", formatter.format_report(&report));

    Ok(())
}

/// Resolve the documents a run should process.
pub fn select_documents(args: &RunArgs, library: &SqliteLibrary) -> Result<Vec<DocumentId>> {
    let ids: Vec<DocumentId> = if args.all {
        library.regular_document_ids()?
    } else {
        args.keys.iter().map(|key| DocumentId::new(key.trim())).collect()
    };

    if ids.is_empty() {
        return Err(CliError::InvalidInput("No documents to process".to_string()));
    }
    Ok(ids)
}

/// Run a batch over `library` with any chat provider.
pub async fn run_batch<P: ChatProvider>(
    provider: P,
    library: SqliteLibrary,
    config: ExtractorConfig,
    ids: &[DocumentId],
) -> Result<BatchReport> {
    let mut runner = BatchRunner::new(provider, library, config)?;
    Ok(runner.run(ids).await?)
}
