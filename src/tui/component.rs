use ratatui::Frame;
use ratatui::layout::Rect;

/// Something that draws itself into a `Rect`.
///
/// Props are struct fields set by the parent before rendering. `render`
/// takes `&mut self` so stateful components can refresh caches (layout
/// heights, scroll offsets) during the draw.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Turns low-level `TuiEvent`s into component-level events.
pub trait EventHandler {
    type Event;

    /// `None` means the event was ignored or fully handled internally.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
