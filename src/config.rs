use crate::services::process_watch::DEFAULT_PROCESS_NAME;
use crate::services::{BackupService, StorePaths};
use crate::styles::ThemeType;
use crate::utils::{default_app_dir, expand_path, get_home_dir};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application settings (`settings.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Launcher data directory holding `state.json` and the profile snapshots
    #[serde(default = "default_app_dir")]
    pub app_dir: PathBuf,
    /// Executable name watched for liveness
    #[serde(default = "default_process_name")]
    pub process_name: String,
    /// Directory that receives backup archives
    #[serde(default = "get_home_dir")]
    pub backup_dir: PathBuf,
    /// Liveness poll period in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Spinner tick period in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// How long a status message stays on the main screen
    #[serde(default = "default_status_lifetime_secs")]
    pub status_lifetime_secs: u64,
    /// UI theme: dark, light or nocolor
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_process_name() -> String {
    DEFAULT_PROCESS_NAME.to_string()
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_status_lifetime_secs() -> u64 {
    3
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            process_name: default_process_name(),
            backup_dir: get_home_dir(),
            poll_interval_ms: default_poll_interval_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            status_lifetime_secs: default_status_lifetime_secs(),
            theme: default_theme(),
        }
    }
}

impl Config {
    /// Load settings from file or create the default file
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read settings file: {:?}", config_path))?;
            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse settings file: {:?}", config_path))?;
            config.expand_paths();
            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Save settings to file
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
        }

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write settings file: {:?}", config_path))?;

        Ok(())
    }

    /// Resolve `~` and home-relative entries in path settings
    fn expand_paths(&mut self) {
        self.app_dir = expand_path(&self.app_dir.to_string_lossy());
        self.backup_dir = expand_path(&self.backup_dir.to_string_lossy());
    }

    /// Store locations for the given profile record path
    pub fn store_paths(&self, profile_config_path: &Path) -> StorePaths {
        StorePaths::new(profile_config_path, &self.app_dir)
    }

    pub fn backup_service(&self) -> BackupService {
        BackupService::new(&self.app_dir, &self.backup_dir)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn status_lifetime(&self) -> Duration {
        Duration::from_secs(self.status_lifetime_secs)
    }

    /// Theme selection; `NO_COLOR` in the environment wins over the setting
    pub fn theme_type(&self) -> ThemeType {
        if std::env::var_os("NO_COLOR").is_some() {
            return ThemeType::NoColor;
        }
        self.theme.parse().unwrap_or_default()
    }
}
