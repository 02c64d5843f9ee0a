//! Action enum for all user-triggered actions
//!
//! These are the discrete input events the screen controller understands.
//! Raw terminal events never reach the controller.

/// All possible user actions in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // ============ Navigation ============
    /// Move selection up in a list
    MoveUp,
    /// Move selection down in a list
    MoveDown,
    /// Go to the first item
    GoToTop,
    /// Go to the last item
    GoToEnd,

    // ============ Selection & Confirmation ============
    /// Confirm selection / submit form (Enter)
    Confirm,
    /// Cancel / go back (Esc)
    Cancel,

    // ============ Global ============
    /// Quit the application
    Quit,
    /// Terminal was resized
    Resize { width: u16, height: u16 },

    // ============ Text editing ============
    /// Insert a character at the cursor
    Insert(char),
    /// Delete character before cursor
    Backspace,
    /// Delete character at cursor
    DeleteChar,
    /// Move cursor left
    MoveLeft,
    /// Move cursor right
    MoveRight,
    /// Jump to start of input
    Home,
    /// Jump to end of input
    End,
}

impl Action {
    /// Check if this action edits or moves within a text input
    pub fn is_text_edit(&self) -> bool {
        matches!(
            self,
            Action::Insert(_)
                | Action::Backspace
                | Action::DeleteChar
                | Action::MoveLeft
                | Action::MoveRight
                | Action::Home
                | Action::End
        )
    }
}
