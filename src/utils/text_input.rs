//! Single-line buffer for typed profile names.

use crate::keymap::Action;

/// Editable line of printable ASCII with a character cap.
///
/// Only ASCII is accepted, so the cursor is both a character and a byte
/// offset into `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
    limit: usize,
}

impl TextInput {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Apply an editing action. Returns false for actions that are not
    /// edits, and for edits that left the buffer unchanged.
    pub fn handle_action(&mut self, action: Action) -> bool {
        let before = (self.text.len(), self.cursor);
        match action {
            Action::Insert(c) if c.is_ascii_graphic() || c == ' ' => {
                if self.text.len() < self.limit {
                    self.text.insert(self.cursor, c);
                    self.cursor += 1;
                }
            }
            Action::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.text.remove(self.cursor);
            }
            Action::DeleteChar if self.cursor < self.text.len() => {
                self.text.remove(self.cursor);
            }
            Action::MoveLeft => self.cursor = self.cursor.saturating_sub(1),
            Action::MoveRight => self.cursor = (self.cursor + 1).min(self.text.len()),
            Action::Home => self.cursor = 0,
            Action::End => self.cursor = self.text.len(),
            _ => return false,
        }
        before != (self.text.len(), self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(limit: usize, s: &str) -> TextInput {
        let mut input = TextInput::with_limit(limit);
        for c in s.chars() {
            input.handle_action(Action::Insert(c));
        }
        input
    }

    #[test]
    fn test_typing_stops_at_limit() {
        let input = typed(4, "pilot");
        assert_eq!(input.text(), "pilo");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_non_ascii_and_control_chars_are_dropped() {
        let input = typed(32, "a\u{e9}\tb");
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn test_edit_in_the_middle() {
        let mut input = typed(32, "mian");
        input.handle_action(Action::Home);
        input.handle_action(Action::MoveRight);
        input.handle_action(Action::MoveRight);
        assert!(input.handle_action(Action::Backspace));
        assert_eq!(input.text(), "man");
        assert_eq!(input.cursor(), 1);

        input.handle_action(Action::Insert('a'));
        input.handle_action(Action::Insert('i'));
        assert!(input.handle_action(Action::DeleteChar));
        assert_eq!(input.text(), "main");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_no_op_edits_report_unchanged() {
        let mut input = typed(2, "ab");
        assert!(!input.handle_action(Action::Insert('c')));
        assert!(!input.handle_action(Action::DeleteChar));
        assert!(!input.handle_action(Action::MoveRight));
        assert!(!input.handle_action(Action::Confirm));

        input.handle_action(Action::Home);
        assert!(!input.handle_action(Action::Backspace));
        assert!(!input.handle_action(Action::MoveLeft));
        assert!(input.handle_action(Action::End));
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut input = typed(8, "alt");
        input.clear();
        assert_eq!(input, TextInput::with_limit(8));
    }
}
