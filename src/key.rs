use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Input symbols understood by the progress tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Tab,
    Enter,
    Char(char),
    /// Anything else; never changes session state
    Ignored,
}

impl From<KeyEvent> for KeyInput {
    fn from(key: KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return KeyInput::Ignored;
        }
        // ctrl/alt chords are commands, not text
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return KeyInput::Ignored;
        }
        match key.code {
            KeyCode::Tab => KeyInput::Tab,
            KeyCode::Enter => KeyInput::Enter,
            KeyCode::Char(c) => KeyInput::Char(c),
            _ => KeyInput::Ignored,
        }
    }
}
