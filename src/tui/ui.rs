use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{FilePanel, MessageList, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Draws one frame.
///
/// ```text
/// ┌ title bar (1 row) ───────────────┐
/// │ transcript (fills the rest)      │
/// ├──────────────────────────────────┤
/// │ input box (3..=8 rows)           │
/// └──────────────────────────────────┘
/// ```
///
/// The file panel, when open, is drawn over everything else.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    MessageList::new(&mut tui.message_list, &app.log, tui.pulse_value).render(frame, main_area);

    let mut title_bar = TitleBar::new(
        app.backend.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    );
    title_bar.render(frame, title_area);

    tui.input_box.render(frame, input_area);

    if app.upload_panel_open {
        FilePanel::new(&mut tui.file_panel, &app.staging, &app.accepted_extensions)
            .render(frame, frame.area());
    }
}
