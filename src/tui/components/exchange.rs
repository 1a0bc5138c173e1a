use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget};

use crate::core::discussion::{Exchange, Response};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Pulse intensity threshold above which the border transitions from normal to BOLD.
const PULSE_BOLD_THRESHOLD: f32 = 0.6;
/// Pulse intensity threshold above which the border transitions from DIM to normal.
const PULSE_NORMAL_THRESHOLD: f32 = 0.2;

const QUERY_PREFIX: &str = "> ";

/// One query and its response, drawn as a single bordered block.
///
/// The query sits on top (prefixed with `> `), the response below it. The
/// response is styled by state: dim italic while pending, red once failed.
///
/// Lines are wrapped with `textwrap` before rendering, so
/// [`calculate_height`](Self::calculate_height) and the rendered output agree
/// row for row.
#[derive(Clone, Copy)]
pub struct ExchangeView<'a> {
    pub exchange: &'a Exchange,
    /// 0.0 to 1.0, animates the border while the response is pending
    pub pulse_intensity: f32,
}

impl<'a> ExchangeView<'a> {
    pub fn new(exchange: &'a Exchange, pulse_intensity: f32) -> Self {
        Self {
            exchange,
            pulse_intensity,
        }
    }

    /// Rows this exchange needs at `width`, borders included.
    ///
    /// Saturates at `u16::MAX` for responses taller than the terminal can address.
    pub fn calculate_height(exchange: &Exchange, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still occupy a row
            return 1;
        }
        let (query, response) = wrapped(exchange, content_width);
        let rows = query.len() + response.len() + usize::from(VERTICAL_OVERHEAD);
        u16::try_from(rows).unwrap_or(u16::MAX)
    }
}

/// Wrapped query and response lines. Each side gets at least one line.
fn wrapped(exchange: &Exchange, content_width: u16) -> (Vec<String>, Vec<String>) {
    let query = format!("{QUERY_PREFIX}{}", exchange.query.trim_end());
    (
        wrap(&query, content_width),
        wrap(exchange.response.text().trim_end(), content_width),
    )
}

fn wrap(text: &str, width: u16) -> Vec<String> {
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    let lines: Vec<String> = textwrap::wrap(text, options)
        .into_iter()
        .map(|l| l.into_owned())
        .collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

fn response_style(response: &Response) -> Style {
    match response {
        Response::Pending => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        Response::Answered(_) => Style::default().fg(Color::Blue),
        Response::Failed => Style::default().fg(Color::Red),
    }
}

impl<'a> Widget for ExchangeView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let query_style = Style::default().fg(Color::Green);
        let body_style = response_style(&self.exchange.response);

        let mut border_style = Style::default().fg(Color::Gray).add_modifier(Modifier::DIM);
        if self.exchange.response.is_pending() {
            // DIM → normal → BOLD while waiting
            if self.pulse_intensity > PULSE_BOLD_THRESHOLD {
                border_style = border_style
                    .remove_modifier(Modifier::DIM)
                    .add_modifier(Modifier::BOLD);
            } else if self.pulse_intensity > PULSE_NORMAL_THRESHOLD {
                border_style = border_style.remove_modifier(Modifier::DIM);
            }
        } else if matches!(self.exchange.response, Response::Failed) {
            border_style = Style::default().fg(Color::Red).add_modifier(Modifier::DIM);
        }

        let title = self.exchange.asked_at.format(" %H:%M:%S ").to_string();
        let block = Block::bordered()
            .title(title)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);

        let (query, response) = wrapped(self.exchange, inner.width);
        let lines: Vec<Line> = query
            .into_iter()
            .map(|l| Line::from(Span::styled(l, query_style)))
            .chain(
                response
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, body_style))),
            )
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn exchange(query: &str, response: Response) -> Exchange {
        Exchange {
            id: 0,
            query: query.to_string(),
            response,
            asked_at: Local::now(),
        }
    }

    #[test]
    fn height_of_short_exchange_is_two_lines_plus_borders() {
        let ex = exchange("hello", Response::Answered("hi".into()));
        assert_eq!(ExchangeView::calculate_height(&ex, 80), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn empty_query_still_takes_a_line() {
        let ex = exchange("", Response::Pending);
        assert_eq!(ExchangeView::calculate_height(&ex, 80), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn zero_width_returns_minimum() {
        let ex = exchange("hello", Response::Pending);
        assert_eq!(ExchangeView::calculate_height(&ex, 0), 1);
        assert_eq!(ExchangeView::calculate_height(&ex, HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn long_response_wraps() {
        // content width = 14 - 4 = 10; "> hello" is 1 line, 25 chars of response is 3
        let ex = exchange("hello", Response::Answered("a".repeat(25)));
        assert_eq!(ExchangeView::calculate_height(&ex, 14), 4 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn huge_response_saturates_height() {
        let ex = exchange("q", Response::Answered("x\n".repeat(70_000)));
        assert_eq!(ExchangeView::calculate_height(&ex, 40), u16::MAX);

        // Just under the limit once borders are added
        let ex = exchange("q", Response::Answered("x\n".repeat(65_534)));
        assert_eq!(ExchangeView::calculate_height(&ex, 40), u16::MAX);
    }

    #[test]
    fn resolving_changes_height() {
        let pending = exchange("q", Response::Pending);
        let answered = exchange("q", Response::Answered("line one\nline two\nline three".into()));
        assert!(
            ExchangeView::calculate_height(&answered, 40)
                > ExchangeView::calculate_height(&pending, 40)
        );
    }

    #[test]
    fn response_styles_by_state() {
        assert_eq!(response_style(&Response::Failed).fg, Some(Color::Red));
        assert_eq!(response_style(&Response::Answered("x".into())).fg, Some(Color::Blue));
        assert!(response_style(&Response::Pending)
            .add_modifier
            .contains(Modifier::ITALIC));
    }

    #[test]
    fn renders_query_and_placeholder() {
        let ex = exchange("what is rust", Response::Pending);
        let height = ExchangeView::calculate_height(&ex, 40);
        let mut terminal = Terminal::new(TestBackend::new(40, height)).unwrap();

        terminal
            .draw(|f| f.render_widget(ExchangeView::new(&ex, 0.0), f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("> what is rust"));
        assert!(text.contains("generating..."));
    }
}
