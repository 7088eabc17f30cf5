//! Parse and serialize the `---`-delimited frontmatter block.
//!
//! The round-trip contract: for any document whose body contains no `---`
//! line ahead of other content and whose keys and values survive trimming,
//! `parse(serialize(doc)) == doc`. Bodies are stored trimmed; whitespace at
//! block boundaries is normalization, not data.

use std::fmt::Write;

use crate::document::{Document, FieldValue, Frontmatter};

/// Parse raw text into a document.
///
/// A header block is a first line of exactly `---`, then `key: value`
/// lines, then a closing `---` line. Input without both delimiters is a
/// document with empty frontmatter and the whole (trimmed) input as body.
///
/// Within the block, blank lines and lines with no `:`, an empty key, or an
/// empty value are skipped. A value wrapped in `[` `]` splits on `,` into a
/// list of trimmed items; anything else is a trimmed scalar. Duplicate keys
/// keep their first position and take the last value.
pub fn parse(raw: &str) -> Document {
    let Some((header, body)) = split_block(raw) else {
        return Document::body_only(raw.trim());
    };

    let mut frontmatter = Frontmatter::new();
    for line in header.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        frontmatter.insert(key, parse_value(value));
    }
    Document::new(frontmatter, body.trim())
}

/// Serialize a document back to raw text.
///
/// Emits `---`, one `key: value` line per entry (lists rendered as
/// `[a, b, c]`), `---`, a blank line, then the trimmed body. A document
/// with empty frontmatter serializes to its bare body so that the
/// round-trip law holds for frontmatter-less documents.
pub fn serialize(doc: &Document) -> String {
    let body = doc.body.trim();
    if doc.frontmatter.is_empty() {
        return body.to_string();
    }

    let mut out = String::from("---\n");
    for (key, value) in doc.frontmatter.iter() {
        match value {
            FieldValue::Scalar(s) => {
                let _ = writeln!(out, "{key}: {s}");
            }
            FieldValue::List(items) => {
                let _ = writeln!(out, "{key}: [{}]", items.join(", "));
            }
        }
    }
    out.push_str("---\n\n");
    out.push_str(body);
    out
}

/// Split off the header block, returning `(header, body)`.
///
/// Returns `None` unless the input starts with a `---` line AND a closing
/// `---` line follows; an unterminated block is body text, not frontmatter.
fn split_block(raw: &str) -> Option<(&str, &str)> {
    let rest = raw
        .strip_prefix("---\r\n")
        .or_else(|| raw.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches('\n').trim_end_matches('\r');
        if trimmed == "---" {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

fn parse_value(value: &str) -> FieldValue {
    if let Some(inner) = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
    {
        let inner = inner.trim();
        if inner.is_empty() {
            return FieldValue::List(Vec::new());
        }
        return FieldValue::List(inner.split(',').map(|item| item.trim().to_string()).collect());
    }
    FieldValue::Scalar(value.to_string())
}
