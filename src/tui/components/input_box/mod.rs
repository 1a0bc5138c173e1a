//! # InputBox Component
//!
//! The draft buffer and the box it is typed into.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Handle submission (Enter), clearing the draft on the same tick
//! - Size itself to the draft (see [`text_wrap::sizing`])
//!
//! ## State Management
//!
//! The buffer is internal state. `waiting` and `suppress_empty` are props
//! synced from the application state every frame. Cursor position and scroll
//! state are encapsulated in `CursorState`.

mod cursor;
pub mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, Sizing, inner_width, next_char_boundary, prev_char_boundary, sizing,
    wrap_options,
};

/// Shown in place of an empty draft.
const PLACEHOLDER: &str = "Query";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the draft (Enter pressed). The box is already empty.
    Submit(String),
    /// Draft or cursor changed; the box may need a new height.
    ContentChanged,
}

/// Text input component.
///
/// # Props
///
/// - `waiting`: a query is in flight; Enter is ignored and the draft kept
/// - `suppress_empty`: Enter on a blank draft does nothing
///
/// # State
///
/// - `buffer`: Current draft
/// - `cursor`: Cursor position, scroll offset, and cached width (see `CursorState`)
pub struct InputBox {
    /// Draft text (Internal State)
    pub buffer: String,
    /// Query in flight (Prop)
    pub waiting: bool,
    /// Ignore blank submissions (Prop)
    pub suppress_empty: bool,
    cursor: CursorState,
}

impl InputBox {
    pub fn new(suppress_empty: bool) -> Self {
        Self {
            buffer: String::new(),
            waiting: false,
            suppress_empty,
            cursor: CursorState::new(),
        }
    }

    /// Replace the draft, moving the cursor to its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor.pos = self.buffer.len();
        self.cursor.follow_cursor(&self.buffer, self.cursor.last_area_width);
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Current sizing for the given area width.
    pub fn sizing(&self, area_width: u16) -> Sizing {
        sizing(&self.buffer, area_width)
    }

    /// Rows the box needs for the current draft, borders included.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        self.sizing(area_width).height
    }

    /// The wrapped rows of the draft that fit in the box, starting at the scroll offset.
    ///
    /// Uses the same wrapping as [`sizing`] and the cursor, so the drawn rows
    /// match the box height.
    fn visible_text(&self, area_width: u16) -> String {
        let width = inner_width(area_width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());
        lines[start..end].join("\n")
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect, sizing: Sizing) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        // ScrollbarState content_length is max scrollable position, not total items
        let max_scroll = sizing.content_lines.saturating_sub(MAX_VISIBLE_LINES);
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(max_scroll as usize)
            .position(self.cursor.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_area_width = area.width;
        self.cursor.follow_cursor(&self.buffer, area.width);

        let title = if self.waiting {
            "Query (waiting for response...)"
        } else {
            "Query (Enter to send, Ctrl+J newline, Ctrl+F files)"
        };
        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .padding(ratatui::widgets::Padding::horizontal(1))
            .title(title);

        let input = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Paragraph::new(self.visible_text(area.width)).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(input.block(block), area);

        let sizing = self.sizing(area.width);
        if sizing.scrollable {
            self.render_scrollbar(frame, area, sizing);
        }

        let (cursor_x, cursor_y) = self.cursor.screen_pos(&self.buffer, area);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals send CRLF or bare CR for pasted newlines
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(self.cursor.pos, &text);
                self.cursor.pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1, self.cursor.last_area_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1, self.cursor.last_area_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => {
                if self.waiting {
                    return None;
                }
                if self.suppress_empty && self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor.reset();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
