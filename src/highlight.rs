use crate::errors::CanvasError;
use serde::{Deserialize, Serialize};

/// A user-highlighted character range in a code artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeHighlight {
    pub start_char_index: usize,
    pub end_char_index: usize,
}

/// A user-highlighted selection in a markdown artifact: the full document,
/// the block containing the selection, and the selected substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextHighlight {
    pub full_markdown: String,
    pub markdown_block: String,
    pub selected_text: String,
}

/// The highlighted code range plus surrounding context, all on char
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodeWindow {
    pub before: String,
    pub highlighted: String,
    pub after: String,
}

/// Cut the highlighted range out of `code` with up to `pad` characters of
/// context on either side.
pub(crate) fn code_window(
    code: &str,
    highlight: CodeHighlight,
    pad: usize,
) -> Result<CodeWindow, CanvasError> {
    let (start, end) = byte_range(code, highlight)?;
    let window_start = byte_offset(code, highlight.start_char_index.saturating_sub(pad))
        .unwrap_or(0);
    let total_chars = code.chars().count();
    let window_end = byte_offset(
        code,
        usize::min(highlight.end_char_index + pad, total_chars),
    )
    .unwrap_or(code.len());

    Ok(CodeWindow {
        before: code[window_start..start].to_string(),
        highlighted: code[start..end].to_string(),
        after: code[end..window_end].to_string(),
    })
}

/// Replace the highlighted range of `code` with `replacement`, returning the
/// full updated text.
pub(crate) fn splice_code(
    code: &str,
    highlight: CodeHighlight,
    replacement: &str,
) -> Result<String, CanvasError> {
    let (start, end) = byte_range(code, highlight)?;
    Ok(format!(
        "{}{}{}",
        &code[..start],
        replacement,
        &code[end..]
    ))
}

/// Replace the highlighted block of `full_markdown` with `replacement`.
/// Fails if the block's anchor text cannot be located.
pub(crate) fn splice_markdown_block(
    full_markdown: &str,
    block: &str,
    replacement: &str,
) -> Result<String, CanvasError> {
    if !full_markdown.contains(block) {
        return Err(CanvasError::SelectorNotFound);
    }
    Ok(full_markdown.replacen(block, replacement, 1))
}

fn byte_range(code: &str, highlight: CodeHighlight) -> Result<(usize, usize), CanvasError> {
    let out_of_bounds = || CanvasError::HighlightOutOfBounds {
        start: highlight.start_char_index,
        end: highlight.end_char_index,
    };
    if highlight.start_char_index > highlight.end_char_index {
        return Err(out_of_bounds());
    }
    let start = byte_offset(code, highlight.start_char_index).ok_or_else(out_of_bounds)?;
    let end = byte_offset(code, highlight.end_char_index).ok_or_else(out_of_bounds)?;
    Ok((start, end))
}

/// Byte offset of the `char_index`-th character boundary, including the end
/// of the string.
fn byte_offset(text: &str, char_index: usize) -> Option<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .nth(char_index)
}
