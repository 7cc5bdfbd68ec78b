//! Annotation block embedded in a document's free-text field
//!
//! A block looks like:
//!
//! ```text
//! ---
//! # ai_metadata
//! institution: MIT
//! task:
//!   - locomotion
//! ---
//! ```
//!
//! Everything outside the block belongs to the user and is preserved
//! byte-for-byte. Values never contain a raw newline; inside a value every
//! backslash is written as `\\` and every colon as `\:`.

use tagwright_domain::{FieldValue, NormalizedRecord};

/// Line opening and closing a block
pub const BLOCK_DELIMITER: &str = "---";

/// Line identifying a block as ours
pub const BLOCK_MARKER: &str = "# ai_metadata";

/// A free-text field split around its annotation block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatedField<'a> {
    /// Text before the block (the whole field when there is no block)
    pub prefix: &'a str,
    /// The block, delimiter lines included
    pub block: Option<&'a str>,
    /// Text after the block
    pub suffix: &'a str,
}

/// Split a free-text field into `{prefix, block, suffix}`
///
/// A block starts at a delimiter line, optionally followed by one arbitrary
/// line, then the marker line, and ends at the next delimiter line.
pub fn parse_field(text: &str) -> AnnotatedField<'_> {
    match find_block(text) {
        Some((start, end)) => AnnotatedField {
            prefix: &text[..start],
            block: Some(&text[start..end]),
            suffix: &text[end..],
        },
        None => AnnotatedField {
            prefix: text,
            block: None,
            suffix: "",
        },
    }
}

/// Render the block content (without delimiters) for a record
pub fn render_content(record: &NormalizedRecord) -> String {
    let mut lines = Vec::new();
    for (key, value) in record.fields() {
        match value {
            FieldValue::Scalar(text) => {
                let text = escape(text);
                if !text.is_empty() {
                    lines.push(format!("{}: {}", key, text));
                }
            }
            FieldValue::List(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| escape(item))
                    .filter(|item| !item.is_empty())
                    .collect();
                if items.is_empty() {
                    continue;
                }
                lines.push(format!("{}:", key));
                lines.extend(items.into_iter().map(|item| format!("  - {}", item)));
            }
        }
    }
    lines.join("\n")
}

/// Wrap block content in the marker and delimiters
pub fn render_block(content: &str) -> String {
    format!(
        "{delim}\n{marker}\n{content}\n{delim}",
        delim = BLOCK_DELIMITER,
        marker = BLOCK_MARKER,
        content = content
    )
}

/// Insert or replace the annotation block in `text`
///
/// Blank content leaves the field untouched. A blank field becomes the block
/// alone; an existing block is replaced in place; otherwise the block is
/// appended after a blank line. Any further stale blocks are dropped so that
/// exactly one block remains.
pub fn upsert(text: &str, content: &str) -> String {
    if content.trim().is_empty() {
        return text.to_string();
    }

    let block = render_block(content);
    if text.trim().is_empty() {
        return block;
    }

    let field = parse_field(text);
    match field.block {
        Some(_) => format!("{}{}{}", field.prefix, block, strip_blocks(field.suffix)),
        None => format!("{}\n\n{}", text.trim_end(), block),
    }
}

/// Read the fields stored in the annotation block of `text`
///
/// Values are returned unescaped. A field without a block yields nothing.
pub fn read_fields(text: &str) -> Vec<(String, FieldValue)> {
    let Some(block) = parse_field(text).block else {
        return Vec::new();
    };

    let mut fields: Vec<(String, FieldValue)> = Vec::new();
    let body = block
        .lines()
        .skip_while(|line| line.trim() != BLOCK_MARKER)
        .skip(1)
        .take_while(|line| line.trim() != BLOCK_DELIMITER);

    for line in body {
        if let Some(item) = line.trim_start().strip_prefix("- ") {
            if let Some((_, FieldValue::List(items))) = fields.last_mut() {
                items.push(unescape(item.trim()));
            }
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            fields.push((key.trim().to_string(), FieldValue::List(Vec::new())));
        } else {
            fields.push((key.trim().to_string(), FieldValue::Scalar(unescape(value))));
        }
    }
    fields
}

fn escape(value: &str) -> String {
    value
        .replace(['\r', '\n'], " ")
        .trim()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
}

/// Undo [`escape`]: a backslash takes the next character literally
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

/// Byte span `(start, end)` of the first block, delimiter lines included
fn find_block(text: &str) -> Option<(usize, usize)> {
    let lines = line_spans(text);
    let line = |i: usize| &text[lines[i].0..lines[i].1];

    for i in 0..lines.len() {
        if line(i).trim() != BLOCK_DELIMITER {
            continue;
        }
        let Some(marker) = (i + 1..lines.len().min(i + 3)).find(|&j| line(j).trim() == BLOCK_MARKER)
        else {
            continue;
        };
        if let Some(end) = (marker + 1..lines.len()).find(|&j| line(j).trim() == BLOCK_DELIMITER) {
            return Some((lines[i].0, lines[end].1));
        }
    }
    None
}

/// Byte spans of each line, line terminators excluded
fn line_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for raw in text.split_inclusive('\n') {
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        spans.push((offset, offset + content.len()));
        offset += raw.len();
    }
    spans
}

fn strip_blocks(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while let Some((start, end)) = find_block(rest) {
        out.push_str(&rest[..start]);
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}
