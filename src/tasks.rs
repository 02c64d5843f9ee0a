//! Background task runner.
//!
//! Long-running work (file copies, archives, process scans) runs on the
//! tokio blocking pool. Every unit of work reports back through one ordered
//! channel as an [`AppEvent`], which the control loop drains one at a time.
//! Tasks never touch screen state.
//!
//! Two tasks repeat: the launcher liveness poll and the spinner tick. Both
//! stop when [`TaskRunner::shutdown`] is called. Everything else fires once.

use crate::services::process_watch::{liveness, ProcessProbe};
use crate::services::{BackupService, ProfileConfig, ProfileStore, StoreError, StorePaths};
use crossterm::event::Event;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// How long the input reader blocks before re-checking for shutdown
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Work the screen controller asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    InitialLoad,
    Backup,
    SwitchProfile(String),
    CreateProfile { name: String, base: Option<String> },
}

/// Completion events, one variant per task kind.
///
/// Errors arrive already rendered so events stay cheap to clone and compare.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// Spinner tick
    Tick,
    /// Result of one liveness poll
    Liveness { running: bool },
    InitialLoad(Result<ProfileConfig, String>),
    /// Path of the written archive
    Backup(Result<PathBuf, String>),
    ProfileSwitched {
        name: String,
        result: Result<ProfileConfig, String>,
    },
    ProfileCreated {
        name: String,
        result: Result<ProfileConfig, String>,
    },
}

/// Everything the control loop consumes.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Terminal(Event),
    Task(TaskEvent),
}

/// Launches background work and routes its results into the event channel.
pub struct TaskRunner {
    handle: Handle,
    tx: UnboundedSender<AppEvent>,
    /// Filled by the initial load; profile tasks run one at a time
    store: Arc<Mutex<Option<ProfileStore>>>,
    paths: StorePaths,
    backup: BackupService,
    shutdown_tx: watch::Sender<bool>,
}

impl TaskRunner {
    /// Create a runner on the given runtime, returning the receiving end of
    /// the event channel.
    pub fn new(
        handle: Handle,
        paths: StorePaths,
        backup: BackupService,
    ) -> (Self, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, _) = watch::channel(false);
        let runner = Self {
            handle,
            tx,
            store: Arc::new(Mutex::new(None)),
            paths,
            backup,
            shutdown_tx,
        };
        (runner, rx)
    }

    /// Launch the task for a controller request.
    pub fn launch(&self, request: TaskRequest) {
        info!("Launching task: {:?}", request);
        match request {
            TaskRequest::InitialLoad => self.run_initial_load(),
            TaskRequest::Backup => self.run_backup(),
            TaskRequest::SwitchProfile(name) => self.run_switch_profile(name),
            TaskRequest::CreateProfile { name, base } => self.run_create_profile(name, base),
        }
    }

    /// Load (or initialize) the profile record.
    pub fn run_initial_load(&self) {
        let paths = self.paths.clone();
        let store = Arc::clone(&self.store);
        self.spawn_once(move || {
            let result = match ProfileStore::load(paths) {
                Ok(loaded) => {
                    let config = loaded.config().clone();
                    *store.lock().unwrap_or_else(PoisonError::into_inner) = Some(loaded);
                    Ok(config)
                }
                Err(e) => {
                    error!("Initial load failed: {}", e);
                    Err(e.to_string())
                }
            };
            TaskEvent::InitialLoad(result)
        });
    }

    /// Write a timestamped archive of the launcher's state files.
    pub fn run_backup(&self) {
        let backup = self.backup.clone();
        self.spawn_once(move || {
            let result = backup.create_backup().map_err(|e| {
                error!("Backup failed: {:#}", e);
                format!("{:#}", e)
            });
            TaskEvent::Backup(result)
        });
    }

    pub fn run_switch_profile(&self, name: String) {
        let store = Arc::clone(&self.store);
        self.spawn_once(move || {
            let result = with_store(&store, |store| {
                store.switch_profile(&name)?;
                Ok(store.config().clone())
            });
            if let Err(e) = &result {
                error!("Switching to profile '{}' failed: {}", name, e);
            }
            TaskEvent::ProfileSwitched { name, result }
        });
    }

    pub fn run_create_profile(&self, name: String, base: Option<String>) {
        let store = Arc::clone(&self.store);
        self.spawn_once(move || {
            let result = with_store(&store, |store| {
                store.create_profile(&name, base.as_deref())?;
                Ok(store.config().clone())
            });
            if let Err(e) = &result {
                error!("Creating profile '{}' failed: {}", name, e);
            }
            TaskEvent::ProfileCreated { name, result }
        });
    }

    /// Poll the launcher process every `interval` until shutdown.
    ///
    /// Each poll runs on the blocking pool and hands the probe back, so the
    /// next poll is armed only after the previous one finished.
    pub fn check_external_app<P>(&self, probe: P, interval: Duration)
    where
        P: ProcessProbe + Send + 'static,
    {
        let tx = self.tx.clone();
        let mut shutdown = self.shutdown_tx.subscribe();
        self.handle.spawn(async move {
            let mut probe = probe;
            loop {
                if *shutdown.borrow() {
                    break;
                }

                let poll = tokio::task::spawn_blocking(move || {
                    let running = liveness(&mut probe);
                    (probe, running)
                })
                .await;

                let running = match poll {
                    Ok((returned, running)) => {
                        probe = returned;
                        running
                    }
                    Err(e) => {
                        warn!("Liveness poll aborted: {}", e);
                        break;
                    }
                };

                if tx.send(AppEvent::Task(TaskEvent::Liveness { running })).is_err() {
                    break;
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = shutdown.changed() => break,
                }
            }
            debug!("Liveness poll stopped");
        });
    }

    /// Emit a spinner tick every `interval` until shutdown.
    pub fn spinner_ticks(&self, interval: Duration) {
        let tx = self.tx.clone();
        let mut shutdown = self.shutdown_tx.subscribe();
        self.handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if tx.send(AppEvent::Task(TaskEvent::Tick)).is_err() {
                            break;
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }
            debug!("Spinner ticks stopped");
        });
    }

    /// Read terminal events on a blocking thread and forward them.
    pub fn forward_terminal_events(&self) {
        let tx = self.tx.clone();
        let shutdown = self.shutdown_tx.subscribe();
        self.handle.spawn_blocking(move || {
            while !*shutdown.borrow() {
                match crossterm::event::poll(INPUT_POLL_INTERVAL) {
                    Ok(true) => match crossterm::event::read() {
                        Ok(event) => {
                            if tx.send(AppEvent::Terminal(event)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Failed to read terminal event: {}", e);
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Failed to poll terminal events: {}", e);
                        break;
                    }
                }
            }
            debug!("Terminal reader stopped");
        });
    }

    /// Stop the repeating tasks and the terminal reader.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    fn spawn_once<F>(&self, work: F)
    where
        F: FnOnce() -> TaskEvent + Send + 'static,
    {
        let tx = self.tx.clone();
        self.handle.spawn_blocking(move || {
            let event = work();
            if tx.send(AppEvent::Task(event)).is_err() {
                debug!("Event channel closed, dropping completion");
            }
        });
    }
}

/// Run a profile operation against the loaded store.
fn with_store<F>(store: &Mutex<Option<ProfileStore>>, op: F) -> Result<ProfileConfig, String>
where
    F: FnOnce(&mut ProfileStore) -> Result<ProfileConfig, StoreError>,
{
    let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
    match guard.as_mut() {
        Some(store) => op(store).map_err(|e| e.to_string()),
        None => Err("Profiles have not been loaded".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Runtime;

    fn runner(rt: &Runtime) -> (TempRunner, UnboundedReceiver<AppEvent>) {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = StorePaths::new(temp.path().join("profiles.json"), temp.path());
        let backup = BackupService::new(temp.path(), temp.path().join("backups"));
        let (runner, rx) = TaskRunner::new(rt.handle().clone(), paths, backup);
        (TempRunner { _temp: temp, runner }, rx)
    }

    struct TempRunner {
        _temp: tempfile::TempDir,
        runner: TaskRunner,
    }

    fn next_task_event(rt: &Runtime, rx: &mut UnboundedReceiver<AppEvent>) -> TaskEvent {
        rt.block_on(async {
            match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
                Ok(Some(AppEvent::Task(event))) => event,
                other => panic!("expected a task event, got {:?}", other),
            }
        })
    }

    #[test]
    fn test_profile_task_before_load_fails() {
        let rt = Runtime::new().unwrap();
        let (env, mut rx) = runner(&rt);

        env.runner.launch(TaskRequest::SwitchProfile("main".to_string()));

        match next_task_event(&rt, &mut rx) {
            TaskEvent::ProfileSwitched { name, result } => {
                assert_eq!(name, "main");
                assert!(result.is_err());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_initial_load_without_live_state_reports_error() {
        let rt = Runtime::new().unwrap();
        let (env, mut rx) = runner(&rt);

        env.runner.launch(TaskRequest::InitialLoad);

        match next_task_event(&rt, &mut rx) {
            TaskEvent::InitialLoad(result) => assert!(result.is_err()),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_spinner_ticks_stop_on_shutdown() {
        let rt = Runtime::new().unwrap();
        let (env, mut rx) = runner(&rt);

        env.runner.spinner_ticks(Duration::from_millis(5));
        assert_eq!(next_task_event(&rt, &mut rx), TaskEvent::Tick);

        env.runner.shutdown();
        rt.block_on(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            while rx.try_recv().is_ok() {}
            tokio::time::sleep(Duration::from_millis(50)).await;
        });
        assert!(rx.try_recv().is_err());
    }
}
