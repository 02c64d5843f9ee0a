use crate::config::Config;
use crate::controller::ScreenController;
use crate::keymap::{self, Action};
use crate::services::SystemProbe;
use crate::styles::Theme;
use crate::tasks::{AppEvent, TaskRunner};
use crate::tui::Tui;
use crate::ui::Ui;
use crate::utils::get_profile_config_path;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

/// How long to wait for background workers on exit
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

/// The interactive control loop.
///
/// Terminal input and task completions arrive on one channel. Each event is
/// handled to completion before the next is read, then the screen is redrawn.
pub struct App {
    config: Config,
    tui: Tui,
    ui: Ui,
    controller: ScreenController,
    runner: TaskRunner,
    events: UnboundedReceiver<AppEvent>,
    should_quit: bool,
    runtime: Option<Runtime>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let (runner, events) = TaskRunner::new(
            runtime.handle().clone(),
            config.store_paths(&get_profile_config_path()),
            config.backup_service(),
        );
        let ui = Ui::new(Theme::new(config.theme_type()));
        let controller = ScreenController::new(config.status_lifetime());
        let tui = Tui::new()?;

        Ok(Self {
            config,
            tui,
            ui,
            controller,
            runner,
            events,
            should_quit: false,
            runtime: Some(runtime),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        info!(
            "Starting TUI (launcher dir: {:?}, watching {})",
            self.config.app_dir, self.config.process_name
        );

        self.runner.forward_terminal_events();
        self.runner.check_external_app(
            SystemProbe::new(self.config.process_name.clone()),
            self.config.poll_interval(),
        );
        self.runner.spinner_ticks(self.config.tick_interval());
        for request in self.controller.start() {
            self.runner.launch(request);
        }

        let result = self.event_loop();

        self.runner.shutdown();
        self.tui.exit()?;
        info!("TUI stopped");
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        while !self.should_quit {
            self.draw()?;

            let Some(event) = self.events.blocking_recv() else {
                warn!("Event channel closed");
                break;
            };
            self.dispatch(event);
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let ui = &self.ui;
        let view = self.controller.view();
        self.tui.draw(|frame| ui.render(frame, &view))
    }

    /// The single dispatch point for every event.
    fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::Terminal(event) => {
                let Some(action) = keymap::map_event(&event, self.controller.is_input_focused())
                else {
                    return;
                };
                if action == Action::Quit {
                    info!("Quit requested");
                    self.should_quit = true;
                    return;
                }
                for request in self.controller.handle_action(action) {
                    self.runner.launch(request);
                }
            }
            AppEvent::Task(event) => self.controller.handle_task_event(event),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.runner.shutdown();
        // A hung file operation must not keep the process alive.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
            debug!("Runtime shut down");
        }
    }
}
