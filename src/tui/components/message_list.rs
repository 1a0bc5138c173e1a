//! # MessageList Component
//!
//! Scrollable view of the discussion log.
//!
//! ## Responsibilities
//!
//! - Display the exchanges in order
//! - Keep the newest exchange in view when the log changes
//! - Manage manual scrolling (wheel, PgUp/PgDn, Ctrl+End)
//! - Cache exchange heights between frames
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the log (props).
//!
//! ## Following the latest exchange
//!
//! The event loop calls [`MessageListState::follow_latest`] whenever the log
//! revision moves. That pins the view to the bottom again, and each render then
//! closes half of the remaining distance (at least one row) until the bottom is
//! reached, which reads as a smooth scroll.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::discussion::DiscussionLog;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::exchange::ExchangeView;
use crate::tui::event::TuiEvent;

const EMPTY_HINT: &str = "Ask a question to get started.";

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, move toward the bottom on every frame
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Log revision last followed
    followed_revision: u64,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
            followed_revision: 0,
        }
    }

    fn total_height(&self) -> u16 {
        self.layout
            .heights
            .iter()
            .fold(0u16, |total, &h| total.saturating_add(h))
    }

    fn max_offset(&self) -> u16 {
        self.total_height().saturating_sub(self.viewport_height)
    }

    /// Bring the newest exchange into view after the log changed.
    ///
    /// Does nothing for an empty log or a revision already followed.
    pub fn follow_latest(&mut self, log: &DiscussionLog) {
        if log.is_empty() || log.revision() == self.followed_revision {
            return;
        }
        self.followed_revision = log.revision();
        self.stick_to_bottom = true;
    }

    /// True while a follow is still travelling toward the bottom.
    pub fn is_animating(&self) -> bool {
        self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }

    /// Content exists below the viewport and the view is not following it.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }

    /// One frame of smooth scrolling toward the bottom.
    pub fn step_toward_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        let next_y = if current.y < max_y {
            let remaining = max_y - current.y;
            current.y + (remaining / 2).max(1)
        } else {
            max_y
        };
        self.scroll_state.set_offset(Position {
            x: current.x,
            y: next_y,
        });
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage following if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable transcript component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub log: &'a DiscussionLog,
    pub pulse_value: f32,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, log: &'a DiscussionLog, pulse_value: f32) -> Self {
        Self {
            state,
            log,
            pulse_value,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;

        if self.log.is_empty() {
            self.state.layout = LayoutCache::new();
            self.state.scroll_state = ScrollViewState::default();
            let hint = Paragraph::new(EMPTY_HINT)
                .style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )
                .alignment(Alignment::Center);
            let y = area.y + area.height / 2;
            frame.render_widget(hint, Rect::new(area.x, y, area.width, 1.min(area.height)));
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let exchanges = self.log.exchanges();

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(exchanges.len(), content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));
        for exchange in exchanges.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(ExchangeView::calculate_height(exchange, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(
            content_width,
            exchanges.iter().position(|e| e.response.is_pending()),
        );

        // 2. Move toward the bottom, or keep a manual offset in bounds
        if self.state.stick_to_bottom {
            self.state.step_toward_bottom();
        } else {
            self.state.clamp_scroll();
        }

        let total_height = self.state.total_height();
        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible exchanges into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let exchange = &exchanges[i];
            let height = self.state.layout.heights[i];
            let pulse = if exchange.response.is_pending() {
                self.pulse_value
            } else {
                0.0
            };
            scroll_view.render_widget(
                ExchangeView::new(exchange, pulse),
                Rect::new(0, y_offset, content_width, height),
            );
            y_offset = y_offset.saturating_add(height);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler lives on `MessageListState` because `MessageList` is rebuilt
/// every frame and cannot hold scroll state.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    exchange_count: usize,
    content_width: u16,
    /// First exchange that was still pending when heights were measured.
    /// Its height changes once it resolves.
    first_pending: Option<usize>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            exchange_count: 0,
            content_width: 0,
            first_pending: None,
        }
    }

    /// How many cached heights are still valid.
    pub fn reusable_count(&self, exchange_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        // The log only grows; fewer exchanges means a different log
        if exchange_count < self.exchange_count {
            return 0;
        }
        self.first_pending
            .unwrap_or(self.exchange_count)
            .min(exchange_count)
    }

    pub fn update_metadata(&mut self, content_width: u16, first_pending: Option<usize>) {
        self.exchange_count = self.heights.len();
        self.content_width = content_width;
        self.first_pending = first_pending;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
