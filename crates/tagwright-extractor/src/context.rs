//! Assembly of the single text context sent to the summarize stage

use crate::config::ExtractorConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use tagwright_domain::DocumentContext;

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("blank line pattern is valid"));
static HORIZONTAL_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("horizontal space pattern is valid"));
static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("html tag pattern is valid"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Render a document's material as one prompt context
///
/// Sections are `Title`, `Abstract`, `PDFText`, `Notes` and `Extra`, each
/// dropped when empty, separated by blank lines.
pub fn render_context(doc: &DocumentContext, config: &ExtractorConfig) -> String {
    let full_text = if config.use_fulltext {
        full_text(&doc.full_texts, config.max_fulltext_chars)
    } else {
        String::new()
    };
    let notes = if config.use_notes {
        notes_text(&doc.notes, config.max_notes_chars)
    } else {
        String::new()
    };

    [
        ("Title", doc.title.trim()),
        ("Abstract", doc.abstract_note.trim()),
        ("PDFText", full_text.as_str()),
        ("Notes", notes.as_str()),
        ("Extra", doc.extra.trim()),
    ]
    .into_iter()
    .filter(|(_, text)| !text.is_empty())
    .map(|(label, text)| format!("{}: {}", label, text))
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Clean extracted attachment text
///
/// Paragraph breaks survive as a single blank line; hard-wrapped lines are
/// joined with a space.
pub fn clean_full_text(raw: &str) -> String {
    let text = raw.replace('\r', "\n");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    let text = text
        .split("\n\n")
        .map(|paragraph| paragraph.replace('\n', " "))
        .collect::<Vec<_>>()
        .join("\n\n");
    HORIZONTAL_SPACE.replace_all(&text, " ").trim().to_string()
}

/// Reduce note HTML to a single line of plain text
pub fn clean_note(html: &str) -> String {
    let text = HTML_TAG.replace_all(html, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn full_text(parts: &[String], max_chars: usize) -> String {
    let cleaned: Vec<String> = parts
        .iter()
        .map(|part| clean_full_text(part))
        .filter(|part| !part.is_empty())
        .collect();
    truncate_chars(&cleaned.join("\n\n"), max_chars)
}

fn notes_text(notes: &[String], max_chars: usize) -> String {
    let cleaned: Vec<String> = notes
        .iter()
        .map(|note| clean_note(note))
        .filter(|note| !note.is_empty())
        .collect();
    truncate_chars(&cleaned.join("\n"), max_chars)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
