//! Locating `<pre><code>` blocks inside generated markup.
//!
//! Blocks are found by plain marker search, not by parsing HTML. The i-th
//! opening marker pairs with the i-th closing marker, so the locator rejects
//! documents where that pairing cannot be right: unequal marker counts, an
//! opening tag with no `>`, or a block that starts before the previous one
//! has closed. Code content is expected to be HTML-escaped, so a literal
//! `</code></pre>` can only appear as a real closing marker.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::model::CodeSegment;

pub const OPEN_MARKER: &str = "<pre><code";
pub const CLOSE_MARKER: &str = "</code></pre>";

const LANGUAGE_PREFIX: &str = "language-";

static CLASS_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|\s)class\s*=\s*"([^"]*)""#).expect("class attribute pattern"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("found {opening} opening and {closing} closing code block markers")]
    Unbalanced { opening: usize, closing: usize },
    #[error("opening code tag at byte {offset} is never closed with '>'")]
    UnterminatedTag { offset: usize },
    #[error("code block at byte {offset} overlaps another block")]
    Overlapping { offset: usize },
}

/// Find every code block and the language it declares.
///
/// Segment offsets delimit the raw content strictly between the end of the
/// opening tag and the closing marker.
pub fn locate_code_blocks(text: &str) -> Result<Vec<CodeSegment>, LocateError> {
    let opening: Vec<usize> = text.match_indices(OPEN_MARKER).map(|(i, _)| i).collect();
    let closing: Vec<usize> = text.match_indices(CLOSE_MARKER).map(|(i, _)| i).collect();

    if opening.len() != closing.len() {
        return Err(LocateError::Unbalanced {
            opening: opening.len(),
            closing: closing.len(),
        });
    }

    let mut segments = Vec::with_capacity(opening.len());
    for (index, (&open, &close)) in opening.iter().zip(&closing).enumerate() {
        let attributes_start = open + OPEN_MARKER.len();
        let tag_end = text[attributes_start..]
            .find('>')
            .map(|offset| attributes_start + offset)
            .ok_or(LocateError::UnterminatedTag { offset: open })?;
        let content_start = tag_end + 1;

        if close < content_start {
            return Err(LocateError::Overlapping { offset: open });
        }
        if let Some(&next_open) = opening.get(index + 1)
            && next_open < close
        {
            return Err(LocateError::Overlapping { offset: next_open });
        }

        segments.push(CodeSegment {
            language: declared_language(&text[attributes_start..tag_end]),
            start: content_start,
            end: close,
        });
    }

    Ok(segments)
}

/// The `<word>` of the first `language-<word>` token in a `class="..."` value.
pub fn declared_language(tag_attributes: &str) -> Option<String> {
    let class_value = CLASS_ATTRIBUTE.captures(tag_attributes)?.get(1)?.as_str();
    class_value
        .split_ascii_whitespace()
        .filter_map(|token| token.strip_prefix(LANGUAGE_PREFIX))
        .find(|word| !word.is_empty() && word.chars().all(|c| c.is_alphanumeric() || c == '_'))
        .map(str::to_owned)
}

/// Rebuild `text` with each segment's content replaced by `render`'s output.
///
/// Text outside the segments is copied unchanged. Segments must be sorted and
/// non-overlapping, as returned by [`locate_code_blocks`].
pub fn splice<E>(
    text: &str,
    segments: &[CodeSegment],
    mut render: impl FnMut(&CodeSegment, &str) -> Result<String, E>,
) -> Result<String, E> {
    let mut output = String::with_capacity(text.len() + text.len() / 2);
    let mut cursor = 0;
    for segment in segments {
        output.push_str(&text[cursor..segment.start]);
        output.push_str(&render(segment, &text[segment.start..segment.end])?);
        cursor = segment.end;
    }
    output.push_str(&text[cursor..]);
    Ok(output)
}
