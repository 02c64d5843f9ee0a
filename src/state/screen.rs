//! The finite set of screens.

/// Application screens
///
/// `InitLoading` is the only initial screen. There is no terminal screen;
/// quitting is handled outside the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Waiting for the profile record to load (or showing why it failed)
    #[default]
    InitLoading,
    /// Top-level menu
    Main,
    /// Pick a profile to switch to
    LoadProfile,
    /// Type a name for a new profile
    CreateProfile,
    /// Pick the profile a new one is copied from
    SelectBaseProfile,
    /// Backup in progress
    Backup,
    /// Profile switch in progress
    LoadingProfile,
}

impl Screen {
    /// Screens that wait on a background task and ignore cancel
    pub fn is_busy(self) -> bool {
        matches!(self, Self::InitLoading | Self::Backup | Self::LoadingProfile)
    }
}
