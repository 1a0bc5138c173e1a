//! # TitleBar Component
//!
//! Top status bar.
//!
//! Shows, left to right:
//!
//! 1. The application name and backend reachability
//! 2. The current status message, if any
//! 3. `↓ New` when the transcript has content below the viewport
//!
//! Purely presentational: all fields are props, filled in by `draw_ui` each frame.

use crate::core::state::BackendStatus;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

const APP_NAME: &str = "QueryDesk";

pub struct TitleBar {
    pub backend: BackendStatus,
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(backend: BackendStatus, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            backend,
            status_message,
            has_unseen_content,
        }
    }

    fn backend_style(&self) -> Style {
        match self.backend {
            BackendStatus::Unknown => Style::default().fg(Color::DarkGray),
            BackendStatus::Online => Style::default().fg(Color::Green),
            BackendStatus::Offline => Style::default().fg(Color::Red),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::raw(format!("{APP_NAME} (")),
            Span::styled(self.backend.label(), self.backend_style()),
            Span::raw(")"),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(" | ↓ New", Style::default().fg(Color::Yellow)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
