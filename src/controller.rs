//! Screen controller: the finite-state screen machine.
//!
//! Receives every input action and every completion event, one at a time,
//! and decides the next screen plus any background work to launch. It never
//! touches the terminal or the filesystem; side effects leave as
//! [`TaskRequest`]s returned to the caller.

use crate::keymap::Action;
use crate::services::ProfileConfig;
use crate::state::{ProfileEntry, Screen, ScreenState, ScreenView};
use crate::tasks::{TaskEvent, TaskRequest};
use crate::utils::{validate_profile_name, TextInput};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Main menu entries, in display order
pub const MAIN_MENU_ITEMS: [&str; 3] = ["Load a profile", "Create a profile", "Backup"];

/// Maximum length of a typed profile name
pub const PROFILE_NAME_LIMIT: usize = 32;

const MENU_LOAD: usize = 0;
const MENU_CREATE: usize = 1;
const MENU_BACKUP: usize = 2;

pub struct ScreenController {
    state: ScreenState,
    /// Read-only copy of the record, refreshed from completion events
    profiles: Option<ProfileConfig>,
    main_menu: ListState,
    profile_list: ListState,
    /// Sentinel entry first, then every profile
    base_profile_list: ListState,
    name_input: TextInput,
    spinner_frame: usize,
    status_lifetime: Duration,
}

impl ScreenController {
    pub fn new(status_lifetime: Duration) -> Self {
        Self {
            state: ScreenState::default(),
            profiles: None,
            main_menu: ListState::default().with_selected(Some(0)),
            profile_list: ListState::default(),
            base_profile_list: ListState::default(),
            name_input: TextInput::with_limit(PROFILE_NAME_LIMIT),
            spinner_frame: 0,
            status_lifetime,
        }
    }

    /// Work to launch when the control loop starts.
    pub fn start(&self) -> Vec<TaskRequest> {
        vec![TaskRequest::InitialLoad]
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.current_screen
    }

    pub fn profile_config(&self) -> Option<&ProfileConfig> {
        self.profiles.as_ref()
    }

    /// Whether keys should be read as text
    pub fn is_input_focused(&self) -> bool {
        self.state.current_screen == Screen::CreateProfile
    }

    /// Handle one input action and return the work it triggers.
    pub fn handle_action(&mut self, action: Action) -> Vec<TaskRequest> {
        debug!("Action {:?} on {:?}", action, self.state.current_screen);

        match action {
            // Quitting is handled by the loop; resizes only need a redraw.
            Action::Quit | Action::Resize { .. } => return Vec::new(),
            Action::Cancel => {
                self.cancel();
                return Vec::new();
            }
            Action::Confirm if self.state.is_external_app_running => {
                debug!("Ignoring confirm while the launcher is running");
                return Vec::new();
            }
            _ => {}
        }

        match self.state.current_screen {
            Screen::Main => self.handle_main(action),
            Screen::LoadProfile => self.handle_load_profile(action),
            Screen::CreateProfile => self.handle_create_profile(action),
            Screen::SelectBaseProfile => self.handle_select_base(action),
            Screen::InitLoading | Screen::Backup | Screen::LoadingProfile => Vec::new(),
        }
    }

    /// Merge a completion event into the screen state.
    ///
    /// Completions always land, whichever screen is showing.
    pub fn handle_task_event(&mut self, event: TaskEvent) {
        if !matches!(event, TaskEvent::Tick | TaskEvent::Liveness { .. }) {
            debug!("Task event {:?} on {:?}", event, self.state.current_screen);
        }

        match event {
            TaskEvent::Tick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                self.expire_status(Instant::now());
            }
            TaskEvent::Liveness { running } => {
                if running != self.state.is_external_app_running {
                    info!("Launcher running: {}", running);
                }
                self.state.is_external_app_running = running;
            }
            TaskEvent::InitialLoad(Ok(config)) => {
                self.state.last_error = None;
                self.set_profiles(config);
                self.state.current_screen = Screen::Main;
            }
            TaskEvent::InitialLoad(Err(e)) => {
                // Nothing works without a record; stay put and show why.
                self.state.last_error = Some(e);
            }
            TaskEvent::Backup(result) => {
                self.return_to_main();
                match result {
                    Ok(path) => self.set_status(format!("Created {}", path.display())),
                    Err(e) => self.state.last_error = Some(e),
                }
            }
            TaskEvent::ProfileSwitched { name, result } => {
                self.return_to_main();
                self.state.selected_profile = None;
                match result {
                    Ok(config) => {
                        self.set_profiles(config);
                        self.set_status(format!("Switched to profile {}", name));
                    }
                    Err(e) => self.state.last_error = Some(e),
                }
            }
            TaskEvent::ProfileCreated { name, result } => {
                self.return_to_main();
                self.state.creating_profile = false;
                self.state.pending_profile_name = None;
                self.name_input.clear();
                match result {
                    Ok(config) => {
                        self.set_profiles(config);
                        self.set_status(format!("Created profile {}", name));
                    }
                    Err(e) => self.state.last_error = Some(e),
                }
            }
        }
    }

    /// Read-only snapshot for rendering.
    pub fn view(&self) -> ScreenView<'_> {
        let list_state = match self.state.current_screen {
            Screen::LoadProfile | Screen::LoadingProfile => &self.profile_list,
            Screen::SelectBaseProfile => &self.base_profile_list,
            _ => &self.main_menu,
        };

        ScreenView {
            screen: self.state.current_screen,
            active_profile: self.profiles.as_ref().map(|c| c.active_profile.as_str()),
            profiles: self.profile_entries(),
            selected_profile: self.state.selected_profile.as_deref(),
            pending_profile_name: self.state.pending_profile_name.as_deref(),
            last_error: self.state.last_error.as_deref(),
            status_message: self.state.status_message.as_deref(),
            is_external_app_running: self.state.is_external_app_running,
            creating_profile: self.state.creating_profile,
            list_state,
            name_input: &self.name_input,
            spinner_frame: self.spinner_frame,
        }
    }

    /// Profiles in creation order, active one flagged
    pub fn profile_entries(&self) -> Vec<ProfileEntry> {
        self.profiles
            .as_ref()
            .map(|config| {
                config
                    .profiles
                    .iter()
                    .map(|name| ProfileEntry {
                        name: name.clone(),
                        is_active: *name == config.active_profile,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn profile_names(&self) -> &[String] {
        self.profiles
            .as_ref()
            .map(|c| c.profiles.as_slice())
            .unwrap_or(&[])
    }

    fn cancel(&mut self) {
        if self.state.current_screen.is_busy() || self.state.creating_profile {
            return;
        }
        self.state.current_screen = Screen::Main;
        self.state.last_error = None;
        self.state.status_message = None;
        self.state.status_expires_at = None;
        self.state.pending_profile_name = None;
        self.name_input.clear();
    }

    fn handle_main(&mut self, action: Action) -> Vec<TaskRequest> {
        if navigate(&mut self.main_menu, action, MAIN_MENU_ITEMS.len()) {
            return Vec::new();
        }
        if action != Action::Confirm {
            return Vec::new();
        }

        self.clear_messages();
        match selected_or_first(&mut self.main_menu, MAIN_MENU_ITEMS.len()) {
            Some(MENU_LOAD) => {
                let active = self
                    .profiles
                    .as_ref()
                    .and_then(|c| c.profiles.iter().position(|p| *p == c.active_profile));
                self.profile_list.select(active.or(Some(0)));
                self.state.current_screen = Screen::LoadProfile;
                Vec::new()
            }
            Some(MENU_CREATE) => {
                self.name_input.clear();
                self.state.current_screen = Screen::CreateProfile;
                Vec::new()
            }
            Some(MENU_BACKUP) => {
                self.state.current_screen = Screen::Backup;
                vec![TaskRequest::Backup]
            }
            _ => Vec::new(),
        }
    }

    fn handle_load_profile(&mut self, action: Action) -> Vec<TaskRequest> {
        let count = self.profile_names().len();
        if navigate(&mut self.profile_list, action, count) {
            return Vec::new();
        }
        if action != Action::Confirm {
            return Vec::new();
        }

        let Some(index) = selected_or_first(&mut self.profile_list, count) else {
            return Vec::new();
        };
        let Some(name) = self.profile_names().get(index).cloned() else {
            return Vec::new();
        };

        self.state.selected_profile = Some(name.clone());
        self.state.current_screen = Screen::LoadingProfile;
        vec![TaskRequest::SwitchProfile(name)]
    }

    fn handle_create_profile(&mut self, action: Action) -> Vec<TaskRequest> {
        if action != Action::Confirm {
            if action.is_text_edit() && self.name_input.handle_action(action) {
                self.state.last_error = None;
            }
            return Vec::new();
        }

        let name = self.name_input.text().to_string();
        if let Err(e) = validate_profile_name(&name, self.profile_names()) {
            debug!("Rejected profile name {:?}: {}", name, e);
            self.state.last_error = Some(e.to_string());
            return Vec::new();
        }

        self.state.last_error = None;
        self.state.pending_profile_name = Some(name);
        self.base_profile_list.select(Some(0));
        self.state.current_screen = Screen::SelectBaseProfile;
        Vec::new()
    }

    fn handle_select_base(&mut self, action: Action) -> Vec<TaskRequest> {
        if self.state.creating_profile {
            return Vec::new();
        }

        let count = self.profile_names().len() + 1;
        if navigate(&mut self.base_profile_list, action, count) {
            return Vec::new();
        }
        if action != Action::Confirm {
            return Vec::new();
        }

        let Some(name) = self.state.pending_profile_name.clone() else {
            self.return_to_main();
            return Vec::new();
        };

        let base = match selected_or_first(&mut self.base_profile_list, count) {
            Some(0) | None => None,
            Some(index) => self.profile_names().get(index - 1).cloned(),
        };

        self.state.creating_profile = true;
        vec![TaskRequest::CreateProfile { name, base }]
    }

    fn set_profiles(&mut self, config: ProfileConfig) {
        let count = config.profiles.len();
        if self.profile_list.selected().is_some_and(|i| i >= count) {
            self.profile_list.select(Some(count.saturating_sub(1)));
        }
        self.profiles = Some(config);
    }

    fn return_to_main(&mut self) {
        self.state.current_screen = Screen::Main;
        self.clear_messages();
    }

    fn clear_messages(&mut self) {
        self.state.last_error = None;
        self.state.status_message = None;
        self.state.status_expires_at = None;
    }

    fn set_status(&mut self, message: String) {
        info!("{}", message);
        self.state.status_message = Some(message);
        self.state.status_expires_at = Some(Instant::now() + self.status_lifetime);
    }

    fn expire_status(&mut self, now: Instant) {
        if self.state.status_expires_at.is_some_and(|at| at <= now) {
            self.state.status_message = None;
            self.state.status_expires_at = None;
        }
    }
}

/// Apply a list navigation action. Returns true if the action was one.
///
/// Movement clamps at both ends; an empty list keeps no selection.
fn navigate(list: &mut ListState, action: Action, count: usize) -> bool {
    let last = count.saturating_sub(1);
    let current = list.selected().unwrap_or(0);
    let target = match action {
        Action::MoveUp => current.saturating_sub(1),
        Action::MoveDown => (current + 1).min(last),
        Action::GoToTop => 0,
        Action::GoToEnd => last,
        _ => return false,
    };
    if count > 0 {
        list.select(Some(target));
    }
    true
}

/// Selected index, selecting the first row if nothing is selected yet.
fn selected_or_first(list: &mut ListState, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let index = list.selected().unwrap_or(0).min(count - 1);
    list.select(Some(index));
    Some(index)
}
