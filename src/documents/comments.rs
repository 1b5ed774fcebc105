//! Line-comment scanning for notebook code cells.
//!
//! The scan is naive: the first `#` on a line starts a comment,
//! even when it sits inside a string literal.

use crate::documents::TranslatableUnit;
use crate::errors::DocumentError;

/// Comment text inside a cell, as character offsets into the cell's full source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSpan {
    pub cell: usize,
    /// First character of the trimmed comment text
    pub start: usize,
    /// One past its last character
    pub end: usize,
    pub text: String,
}

impl TranslatableUnit for CommentSpan {
    fn source_text(&self) -> &str {
        &self.text
    }
}

/// Find the `#` comments of a cell's source, one span per non-blank comment
pub fn scan_line_comments(cell: usize, source: &str) -> Vec<CommentSpan> {
    let mut spans = Vec::new();
    let mut line_offset = 0;

    for line in source.split('\n') {
        if let Some(marker) = line.find('#') {
            let after = &line[marker + 1..];
            let text = after.trim();
            if !text.is_empty() {
                let leading = after.chars().count() - after.trim_start().chars().count();
                let start = line_offset + line[..marker].chars().count() + 1 + leading;
                spans.push(CommentSpan {
                    cell,
                    start,
                    end: start + text.chars().count(),
                    text: text.to_string(),
                });
            }
        }
        line_offset += line.chars().count() + 1;
    }

    spans
}

/// Replace spans of `original` with their translations
///
/// Every span must have been computed against `original`. Replacements are
/// made from the highest offset down so earlier offsets stay valid.
pub fn splice_spans(original: &str, edits: &[(&CommentSpan, &str)]) -> Result<String, DocumentError> {
    let mut ordered: Vec<&(&CommentSpan, &str)> = edits.iter().collect();
    ordered.sort_by(|a, b| b.0.start.cmp(&a.0.start));

    let char_count = original.chars().count();
    let mut result = original.to_string();

    for (span, translation) in ordered {
        if span.start > span.end || span.end > char_count {
            return Err(DocumentError::Notebook(format!(
                "comment span {}..{} is outside cell {} ({} characters)",
                span.start, span.end, span.cell, char_count
            )));
        }
        let start = byte_index(original, span.start);
        let end = byte_index(original, span.end);
        result.replace_range(start..end, translation);
    }

    Ok(result)
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
