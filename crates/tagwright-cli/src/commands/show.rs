//! Show command implementation.

use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use tagwright_domain::traits::DocumentStore;
use tagwright_domain::DocumentId;
use tagwright_extractor::read_fields;
use tagwright_store::SqliteLibrary;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, library: &SqliteLibrary, formatter: &Formatter) -> Result<()> {
    println!("{}", describe_document(&args.key, library, formatter)?);
    Ok(())
}

/// Render a document's tags and annotation block.
pub fn describe_document(key: &str, library: &SqliteLibrary, formatter: &Formatter) -> Result<String> {
    let id = DocumentId::new(key);
    let doc = library
        .context(&id)?
        .ok_or_else(|| CliError::NotFound(key.to_string()))?;
    let tags = library.tags(&id)?;
    let fields = read_fields(&doc.extra);

    Ok(formatter.format_document(key, &doc.title, &tags, &fields))
}
