//! Cursor tracking for the InputBox.
//!
//! `CursorState` owns the cursor byte offset, the internal scroll offset used
//! once the draft overflows `MAX_VISIBLE_LINES`, and the width seen at the last
//! render. The draft itself belongs to `InputBox` and is passed in explicitly.

use super::text_wrap::{
    BORDER_OFFSET, CONTENT_OFFSET_X, MAX_VISIBLE_LINES, inner_width, sizing, wrap_options,
};
use ratatui::layout::Rect;

pub(super) struct CursorState {
    /// Byte offset into the draft (0..=draft.len())
    pub pos: usize,
    /// First visible wrapped line (0 unless the draft overflows)
    pub scroll_offset: u16,
    /// Area width from the last render, used by vertical movement between frames
    pub last_area_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_area_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Back to the start of an empty draft.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Wrapped lines of `draft` with the byte offset each one starts at.
    fn line_starts(draft: &str, width: u16) -> Vec<(usize, usize)> {
        let lines = textwrap::wrap(draft, wrap_options(width));
        let mut starts = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            starts.push((offset, line.len()));
            offset += line.len();
            // Skip the separator textwrap consumed (newline or a single space)
            if offset < draft.len() && matches!(draft.as_bytes()[offset], b'\n' | b' ') {
                offset += 1;
            }
        }
        starts
    }

    /// Move one wrapped line up (`-1`) or down (`1`), keeping the column where possible.
    ///
    /// Returns `false` when already on the first/last line.
    pub fn move_vertically(&mut self, draft: &str, direction: i16, area_width: u16) -> bool {
        let width = inner_width(area_width);
        if width == 0 || draft.is_empty() {
            return false;
        }

        let starts = Self::line_starts(draft, width);
        if starts.is_empty() {
            return false;
        }

        let current = starts
            .iter()
            .rposition(|&(start, _)| start <= self.pos)
            .unwrap_or(0);
        let column = self.pos - starts[current].0;

        let target = match direction {
            d if d < 0 && current > 0 => current - 1,
            d if d > 0 && current + 1 < starts.len() => current + 1,
            _ => return false,
        };

        let (start, len) = starts[target];
        self.pos = start + column.min(len);
        // Never land inside a multibyte char
        while !draft.is_char_boundary(self.pos) {
            self.pos -= 1;
        }
        true
    }

    /// Which wrapped line (0-based) the cursor is on.
    pub fn line_of_cursor(&self, draft: &str, area_width: u16) -> u16 {
        let width = inner_width(area_width);
        if width == 0 {
            return 0;
        }

        let before = &draft[..self.pos];
        let lines = textwrap::wrap(before, wrap_options(width));
        let mut line = lines.len().saturating_sub(1) as u16;

        // A newline right before the cursor starts a line textwrap did not emit
        if before.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
            line += 1;
        }
        line
    }

    /// Scroll the box so the cursor line stays within the visible rows.
    pub fn follow_cursor(&mut self, draft: &str, area_width: u16) {
        if !sizing(draft, area_width).scrollable {
            self.scroll_offset = 0;
            return;
        }

        let line = self.line_of_cursor(draft, area_width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line - (MAX_VISIBLE_LINES - 1);
        }
    }

    /// Terminal (column, row) of the cursor inside `area`.
    pub fn screen_pos(&self, draft: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + CONTENT_OFFSET_X, area.y + BORDER_OFFSET);
        }

        let before = &draft[..self.pos];
        let line = self.line_of_cursor(draft, area.width);

        // Column from the start of the current logical line, since textwrap
        // trims trailing spaces from wrapped segments.
        let logical_start = before.rfind('\n').map(|p| p + 1).unwrap_or(0);
        let logical = &before[logical_start..];
        let segments = textwrap::wrap(logical, wrap_options(width));
        let column = match segments.split_last() {
            None => 0,
            Some((_, earlier)) => {
                let consumed: usize = earlier.iter().map(|seg| seg.chars().count()).sum();
                logical.chars().count().saturating_sub(consumed) as u16
            }
        };

        let visible_line = line.saturating_sub(self.scroll_offset);
        (
            area.x + CONTENT_OFFSET_X + column,
            area.y + BORDER_OFFSET + visible_line,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_movement_keeps_column() {
        let draft = "hello\nworld";
        let mut cursor = CursorState::new();
        cursor.pos = 2; // "he|llo"

        assert!(cursor.move_vertically(draft, 1, 80));
        assert_eq!(cursor.pos, 8); // "wo|rld"

        assert!(!cursor.move_vertically(draft, 1, 80), "already on last line");
        assert!(cursor.move_vertically(draft, -1, 80));
        assert_eq!(cursor.pos, 2);
    }

    #[test]
    fn vertical_movement_clamps_to_shorter_line() {
        let draft = "hi\nlonger line";
        let mut cursor = CursorState::new();
        cursor.pos = draft.len();

        assert!(cursor.move_vertically(draft, -1, 80));
        assert_eq!(cursor.pos, 2);
    }

    #[test]
    fn cursor_after_trailing_newline_is_on_next_line() {
        let mut cursor = CursorState::new();
        cursor.pos = 6;
        assert_eq!(cursor.line_of_cursor("hello\n", 80), 1);
    }

    #[test]
    fn follow_cursor_scrolls_past_six_lines() {
        let draft = "1\n2\n3\n4\n5\n6\n7\n8";
        let mut cursor = CursorState::new();
        cursor.pos = draft.len();
        cursor.follow_cursor(draft, 80);
        assert_eq!(cursor.scroll_offset, 2);

        cursor.pos = 0;
        cursor.follow_cursor(draft, 80);
        assert_eq!(cursor.scroll_offset, 0);
    }

    #[test]
    fn screen_pos_accounts_for_border_and_padding() {
        let mut cursor = CursorState::new();
        cursor.pos = 3;
        let area = Rect::new(0, 10, 40, 3);
        // border (1) + padding (1) + "abc" (3)
        assert_eq!(cursor.screen_pos("abc", area), (5, 11));
    }

    #[test]
    fn screen_pos_on_second_wrapped_row() {
        // inner width 16: "aaaa...a" fills row 0, cursor lands after 4 chars of row 1
        let draft = format!("{}{}", "a".repeat(16), "b".repeat(4));
        let mut cursor = CursorState::new();
        cursor.pos = draft.len();
        let area = Rect::new(0, 0, 20, 4);
        assert_eq!(cursor.screen_pos(&draft, area), (6, 2));
    }
}
