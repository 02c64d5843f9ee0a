//! Application state management.
//!
//! The screen controller owns a single `ScreenState`. It is transient,
//! never persisted, and only mutated on the control loop while one event is
//! being handled. The presentation layer sees it through a read-only
//! `ScreenView`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 ScreenController                     │
//! ├──────────────────────────────────────────────────────┤
//! │  ┌────────────────────────┐  ┌────────────────────┐  │
//! │  │ ScreenState            │  │ widget state       │  │
//! │  │ - current_screen       │  │ - list selections  │  │
//! │  │ - selected_profile     │  │ - name input       │  │
//! │  │ - pending_profile_name │  │ - spinner frame    │  │
//! │  │ - last_error / status  │  └────────────────────┘  │
//! │  │ - launcher running     │                          │
//! │  └────────────────────────┘                          │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ view()
//!                            ▼
//!                      ScreenView ──► ui::render
//! ```

pub mod screen;

pub use screen::Screen;

use crate::utils::TextInput;
use ratatui::widgets::ListState;
use std::time::Instant;

/// Transient UI state owned by the screen controller.
#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    /// Screen currently shown
    pub current_screen: Screen,
    /// Profile picked on the load screen
    pub selected_profile: Option<String>,
    /// Validated name waiting for a base profile
    pub pending_profile_name: Option<String>,
    /// Last failure, shown until the user moves on
    pub last_error: Option<String>,
    /// Last success message
    pub status_message: Option<String>,
    /// Whether the launcher process was seen on the last poll
    pub is_external_app_running: bool,
    /// A create request is in flight; the base list ignores input until it lands
    pub creating_profile: bool,
    /// When the status message should disappear
    pub status_expires_at: Option<Instant>,
}

/// One row of a profile list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub name: String,
    pub is_active: bool,
}

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug)]
pub struct ScreenView<'a> {
    pub screen: Screen,
    /// Active profile name, once loaded
    pub active_profile: Option<&'a str>,
    /// Known profiles in creation order
    pub profiles: Vec<ProfileEntry>,
    pub selected_profile: Option<&'a str>,
    pub pending_profile_name: Option<&'a str>,
    pub last_error: Option<&'a str>,
    pub status_message: Option<&'a str>,
    pub is_external_app_running: bool,
    pub creating_profile: bool,
    /// Selection of the list on the current screen
    pub list_state: &'a ListState,
    pub name_input: &'a TextInput,
    pub spinner_frame: usize,
}
