//! Keyboard mapping
//!
//! Turns raw crossterm events into [`Action`]s. The mapping depends on
//! whether a text input has focus: while typing a profile name, letters
//! are text and only Enter, Esc, Ctrl+C and the editing keys keep their
//! meaning.

mod actions;

pub use actions::Action;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a terminal event to an action, if it has one.
pub fn map_event(event: &Event, input_focused: bool) -> Option<Action> {
    match event {
        Event::Key(key) => map_key(key, input_focused),
        Event::Resize(width, height) => Some(Action::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

/// Map a key press to an action.
pub fn map_key(key: &KeyEvent, input_focused: bool) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        _ if input_focused => map_text_key(key),
        KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::GoToTop),
        KeyCode::End | KeyCode::Char('G') => Some(Action::GoToEnd),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

fn map_text_key(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(Action::Insert(c)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Delete => Some(Action::DeleteChar),
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Home => Some(Action::Home),
        KeyCode::End => Some(Action::End),
        _ => None,
    }
}
