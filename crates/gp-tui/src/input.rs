//! Input handling - convert key events to UI actions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Something the user asked the UI to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextView,
    PrevView,
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    Quit,
    Help,
    /// Add a route interval
    Add,
    /// Remove the selected route interval
    Remove,
    /// Save the projection to history
    Save,
    /// Delete the selected history entry
    Delete,
    /// Clear history
    Clear,
}

/// Convert a key event to an action.
///
/// Text entry in the interval editor reads raw keys and never goes through
/// this table.
pub fn key_to_action(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Right),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::Char('a') => Some(Action::Add),
        KeyCode::Char('x') | KeyCode::Delete => Some(Action::Remove),
        KeyCode::Char('s') => Some(Action::Save),
        KeyCode::Char('d') => Some(Action::Delete),
        KeyCode::Char('c') => Some(Action::Clear),
        _ => None,
    }
}
