use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Non mapped key or event
    None,
    /// Quit application
    Quit,
    /// Open the current track in the default browser
    OpenSong,
    /// Poll now instead of waiting for the timer
    Refresh,
    Render,
    Tick,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Action::Quit,
            (KeyCode::Char('o'), _) => Action::OpenSong,
            (KeyCode::Char('r'), _) => Action::Refresh,
            _ => Action::None,
        }
    }
}

impl From<Event> for Action {
    fn from(event: Event) -> Self {
        match event {
            Event::Tick => Action::Tick,
            Event::Render | Event::Resize(_, _) => Action::Render,
            Event::Key(key) => Action::from(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn keymaps() {
        assert_eq!(Action::from(key(KeyCode::Char('q'), KeyModifiers::NONE)), Action::Quit);
        assert_eq!(Action::from(key(KeyCode::Esc, KeyModifiers::NONE)), Action::Quit);
        assert_eq!(Action::from(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
        assert_eq!(Action::from(key(KeyCode::Char('c'), KeyModifiers::NONE)), Action::None);
        assert_eq!(Action::from(key(KeyCode::Char('o'), KeyModifiers::NONE)), Action::OpenSong);
        assert_eq!(Action::from(key(KeyCode::Char('r'), KeyModifiers::NONE)), Action::Refresh);
    }

    #[test]
    fn resize_renders() {
        assert_eq!(Action::from(Event::Resize(80, 24)), Action::Render);
        assert_eq!(Action::from(Event::Tick), Action::Tick);
    }
}
