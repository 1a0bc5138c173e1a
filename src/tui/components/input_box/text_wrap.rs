//! Pure text wrapping and sizing for the InputBox.
//!
//! These are stateless helpers with no dependency on InputBox or CursorState.

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub const MAX_VISIBLE_LINES: u16 = 6;
/// Rows from the area's top edge to the first content row (top border)
pub(super) const BORDER_OFFSET: u16 = 1;
/// Columns from the area's left edge to the first content column (border + padding)
pub(super) const CONTENT_OFFSET_X: u16 = 2;

/// Height of the input box for a given draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sizing {
    /// Rows the draft needs when fully laid out.
    pub content_lines: u16,
    /// Total rows of the box, borders included.
    pub height: u16,
    /// Whether the draft overflows and the box scrolls internally.
    pub scrollable: bool,
}

/// Size the input box from scratch for `text` at `area_width`.
///
/// Always measures the whole draft, so deleting text shrinks the box again.
pub fn sizing(text: &str, area_width: u16) -> Sizing {
    let content_lines = wrap_line_count(text, inner_width(area_width));
    Sizing {
        content_lines,
        height: content_lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD,
        scrollable: content_lines > MAX_VISIBLE_LINES,
    }
}

/// Build textwrap options configured for the input box inner width.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Calculate the inner content width after subtracting border/padding overhead.
/// Returns 0 if the area is too narrow.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Count wrapped lines for the given text, accounting for trailing newlines
/// that textwrap may not represent as empty lines.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }

    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);

    // textwrap doesn't always produce an empty trailing line for a trailing newline
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }

    count
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
