//! # File Panel Component
//!
//! Overlay for staging files. Opened and closed with Ctrl+F; closing it
//! discards everything staged.
//!
//! A terminal has no native file dialog, so each picker slot is a row where
//! the user types a path and presses Enter. Rows are listed open slots first,
//! then staged files, each group newest first.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `FilePanelState` lives in `TuiState`
//! - `FilePanel` is created each frame with borrowed state

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::core::staging::{FileStagingList, SlotId, format_size};
use crate::tui::event::TuiEvent;

const HELP_TEXT: &str =
    " Ctrl+N Add  Enter Choose  Del Remove  Ctrl+U Upload  Ctrl+O Organize  Esc Close ";

/// A row in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelRow {
    /// Picker slot waiting for a path
    Slot(SlotId),
    /// File staged from this slot
    Staged(SlotId),
}

fn rows(staging: &FileStagingList) -> Vec<PanelRow> {
    staging
        .open_slots()
        .iter()
        .rev()
        .map(|&slot| PanelRow::Slot(slot))
        .chain(staging.staged().map(|s| PanelRow::Staged(s.id)))
        .collect()
}

/// Events emitted by the file panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// Resolve `slot` with the file at `path`
    Choose { slot: SlotId, path: String },
    /// The user abandoned the path typed into `slot`
    Cancel(SlotId),
    Remove(SlotId),
    AddSlot,
    Upload,
    Organize,
    Dismiss,
}

/// Persistent state for the file panel overlay.
#[derive(Default)]
pub struct FilePanelState {
    pub selected: usize,
    /// Path typed so far, per open slot
    pub drafts: HashMap<SlotId, String>,
    pub list_state: ListState,
}

impl FilePanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop drafts of closed slots and keep the selection on an existing row.
    pub fn sync(&mut self, staging: &FileStagingList) {
        self.drafts
            .retain(|slot, _| staging.open_slots().contains(slot));
        let count = rows(staging).len();
        if count == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(count - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn selected_row(&self, staging: &FileStagingList) -> Option<PanelRow> {
        rows(staging).get(self.selected).copied()
    }

    /// Handle a key event, returning a PanelEvent if the loop should act.
    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        staging: &FileStagingList,
    ) -> Option<PanelEvent> {
        let row = self.selected_row(staging);
        match event {
            TuiEvent::Escape => match row {
                Some(PanelRow::Slot(slot))
                    if self.drafts.get(&slot).is_some_and(|d| !d.is_empty()) =>
                {
                    self.drafts.remove(&slot);
                    Some(PanelEvent::Cancel(slot))
                }
                _ => Some(PanelEvent::Dismiss),
            },
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::CursorDown => {
                let count = rows(staging).len();
                if count > 0 {
                    self.selected = (self.selected + 1).min(count - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::AddPickerSlot => {
                // The new slot becomes the first row
                self.selected = 0;
                self.list_state.select(Some(0));
                Some(PanelEvent::AddSlot)
            }
            TuiEvent::UploadFiles => Some(PanelEvent::Upload),
            TuiEvent::OrganizeFiles => Some(PanelEvent::Organize),
            TuiEvent::Delete => row.map(|r| match r {
                PanelRow::Slot(id) | PanelRow::Staged(id) => PanelEvent::Remove(id),
            }),
            TuiEvent::InputChar(c) if *c != '\n' => {
                if let Some(PanelRow::Slot(slot)) = row {
                    self.drafts.entry(slot).or_default().push(*c);
                }
                None
            }
            TuiEvent::Paste(text) => {
                if let Some(PanelRow::Slot(slot)) = row {
                    let line = text.lines().next().unwrap_or_default().trim();
                    self.drafts.entry(slot).or_default().push_str(line);
                }
                None
            }
            TuiEvent::Backspace => {
                if let Some(PanelRow::Slot(slot)) = row
                    && let Some(draft) = self.drafts.get_mut(&slot)
                {
                    draft.pop();
                }
                None
            }
            TuiEvent::Submit => match row {
                Some(PanelRow::Slot(slot)) => {
                    let path = self.drafts.get(&slot).map(|d| d.trim()).unwrap_or_default();
                    (!path.is_empty()).then(|| PanelEvent::Choose {
                        slot,
                        path: path.to_string(),
                    })
                }
                _ => None,
            },
            _ => None,
        }
    }
}

/// Transient render wrapper for the file panel overlay.
pub struct FilePanel<'a> {
    state: &'a mut FilePanelState,
    staging: &'a FileStagingList,
    accepted_extensions: &'a [String],
}

impl<'a> FilePanel<'a> {
    pub fn new(
        state: &'a mut FilePanelState,
        staging: &'a FileStagingList,
        accepted_extensions: &'a [String],
    ) -> Self {
        Self {
            state,
            staging,
            accepted_extensions,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync(self.staging);

        let overlay = centered_rect(80, 60, area);
        frame.render_widget(Clear, overlay);

        let accepted = self
            .accepted_extensions
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(" ");
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Files ({accepted}) "))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(HELP_TEXT).centered())
            .padding(Padding::horizontal(1));

        let rows = rows(self.staging);
        if rows.is_empty() {
            let empty = Paragraph::new("No files staged. Press Ctrl+N to pick one.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        let inner_width = overlay.width.saturating_sub(4) as usize; // borders + padding
        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let selected = i == self.state.selected;
                let style = if selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let line = match *row {
                    PanelRow::Slot(slot) => {
                        let draft = self.state.drafts.get(&slot).map(String::as_str).unwrap_or("");
                        let caret = if selected { "_" } else { "" };
                        let label = format!("#{slot} path: ");
                        let room = inner_width.saturating_sub(label.chars().count() + 1);
                        Line::from(vec![
                            Span::styled(label, style),
                            Span::styled(format!("{}{caret}", tail_str(draft, room)), style),
                        ])
                    }
                    PanelRow::Staged(id) => {
                        let Some(staged) = self.staging.staged().find(|s| s.id == id) else {
                            return ListItem::new(Line::default());
                        };
                        let size = format_size(staged.file.size);
                        let name_width = inner_width.saturating_sub(size.len() + 2);
                        let name = truncate_str(&staged.file.name, name_width);
                        Line::from(vec![
                            Span::styled(format!("{name:<name_width$}"), style),
                            Span::styled("  ", style),
                            Span::styled(size, style),
                        ])
                    }
                };
                ListItem::new(line)
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Truncate a string to fit within `max_width` chars, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{head}...")
    }
}

/// Keep the end of a path visible when it is too long, prefixing "...".
fn tail_str(s: &str, max_width: usize) -> String {
    let count = s.chars().count();
    if count <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let tail: String = s.chars().skip(count - (max_width - 3)).collect();
        format!("...{tail}")
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
