//! Vocab command implementation.

use crate::cli::VocabArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tagwright_extractor::{FieldFrequencyTable, VocabularyGuide};
use tagwright_store::SqliteLibrary;

/// Execute the vocab command.
pub fn execute_vocab(
    args: VocabArgs,
    config: &Config,
    library: &SqliteLibrary,
    formatter: &Formatter,
) -> Result<()> {
    let table = FieldFrequencyTable::load(library);

    if args.guide {
        let guide = VocabularyGuide::render(&table, &config.extractor);
        if guide.is_empty() {
            println!("{}", formatter.warning("No structured tags; prompts will carry no guide."));
        } else {
            println!("{}", guide.as_str());
        }
    } else {
        println!("{}", formatter.format_vocabulary(&table, args.field.as_deref()));
    }

    Ok(())
}
