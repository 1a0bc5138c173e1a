use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use log::warn;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Core actions (passed to core::update)
    ForceQuit,
    Submit,
    ToggleUploadPanel, // Ctrl+F
    AddPickerSlot,     // Ctrl+N (upload panel)
    UploadFiles,       // Ctrl+U (upload panel)
    OrganizeFiles,     // Ctrl+O (upload panel)

    // TUI-local events (handled directly in TUI)
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    Escape,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToBottom, // Ctrl+End - also re-enables stick-to-bottom
    Resize,
}

/// Poll for an event with timeout
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Event poll failed: {}", e);
            return None;
        }
    }

    let event = match event::read() {
        Ok(event) => event,
        Err(e) => {
            warn!("Event read failed: {}", e);
            return None;
        }
    };
    translate(event)
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Keyboard enhancement reports releases too; only act on presses and repeats
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (KeyModifiers::CONTROL, KeyCode::Char('f')) => Some(TuiEvent::ToggleUploadPanel),
                (KeyModifiers::CONTROL, KeyCode::Char('n')) => Some(TuiEvent::AddPickerSlot),
                (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(TuiEvent::UploadFiles),
                (KeyModifiers::CONTROL, KeyCode::Char('o')) => Some(TuiEvent::OrganizeFiles),
                // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
                (KeyModifiers::CONTROL, KeyCode::Char('j')) => Some(TuiEvent::InputChar('\n')),
                (KeyModifiers::SHIFT, KeyCode::Enter) => Some(TuiEvent::InputChar('\n')),
                (KeyModifiers::CONTROL, KeyCode::End) => Some(TuiEvent::ScrollToBottom),
                // Regular key handling
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Delete) => Some(TuiEvent::Delete),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
                (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
                (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
                (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
                (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
                (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
                (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
                (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState};

    fn key(modifiers: KeyModifiers, code: KeyCode) -> Event {
        Event::Key(KeyEvent::new_with_kind_and_state(
            code,
            modifiers,
            KeyEventKind::Press,
            KeyEventState::NONE,
        ))
    }

    #[test]
    fn control_bindings() {
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('f'))),
            Some(TuiEvent::ToggleUploadPanel)
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(TuiEvent::ForceQuit)
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('j'))),
            Some(TuiEvent::InputChar('\n'))
        );
    }

    #[test]
    fn plain_characters_and_enter() {
        assert_eq!(
            translate(key(KeyModifiers::NONE, KeyCode::Char('f'))),
            Some(TuiEvent::InputChar('f'))
        );
        assert_eq!(
            translate(key(KeyModifiers::SHIFT, KeyCode::Char('F'))),
            Some(TuiEvent::InputChar('F'))
        );
        assert_eq!(translate(key(KeyModifiers::NONE, KeyCode::Enter)), Some(TuiEvent::Submit));
    }

    #[test]
    fn key_release_is_ignored() {
        let release = Event::Key(KeyEvent::new_with_kind_and_state(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        ));
        assert_eq!(translate(release), None);
    }

    #[test]
    fn resize_and_paste() {
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
        assert_eq!(
            translate(Event::Paste("a\nb".into())),
            Some(TuiEvent::Paste("a\nb".into()))
        );
    }
}
