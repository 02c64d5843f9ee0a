//! Shared test utilities for workflow integration tests.
//!
//! Provides `TestEnv` - an isolated launcher setup (home, launcher data
//! directory, backup directory) inside a `TempDir`. All paths are injected
//! into the code under test, so tests can run in parallel.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use eve_launch_manager::config::Config;
use eve_launch_manager::services::process_watch::ProcessProbe;
use eve_launch_manager::services::{BackupService, ProfileConfig, ProfileStore, StorePaths};

/// An isolated launcher environment.
///
/// Layout:
/// - `home/` - fake home directory holding the profile record
/// - `home/EVE Online/` - launcher data directory (live state and snapshots)
/// - `home/backups/` - where archives go
#[allow(dead_code)]
pub struct TestEnv {
    temp_dir: TempDir,
    pub home_dir: PathBuf,
    pub app_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub profile_config_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new TestEnvBuilder for fluent configuration.
    pub fn new() -> TestEnvBuilder {
        TestEnvBuilder::default()
    }

    // ==================== Wiring ====================

    pub fn store_paths(&self) -> StorePaths {
        StorePaths::new(&self.profile_config_path, &self.app_dir)
    }

    pub fn backup_service(&self) -> BackupService {
        BackupService::new(&self.app_dir, &self.backup_dir)
    }

    pub fn load_store(&self) -> Result<ProfileStore> {
        ProfileStore::load(self.store_paths()).context("Failed to load store")
    }

    /// Settings pointing at this environment
    pub fn settings(&self) -> Config {
        Config {
            app_dir: self.app_dir.clone(),
            backup_dir: self.backup_dir.clone(),
            ..Config::default()
        }
    }

    // ==================== File Helpers ====================

    pub fn live_state_path(&self) -> PathBuf {
        self.store_paths().live_state_path()
    }

    pub fn snapshot_path(&self, profile: &str) -> PathBuf {
        self.store_paths().snapshot_path(profile)
    }

    pub fn live_state(&self) -> Option<String> {
        fs::read_to_string(self.live_state_path()).ok()
    }

    pub fn snapshot(&self, profile: &str) -> Option<String> {
        fs::read_to_string(self.snapshot_path(profile)).ok()
    }

    pub fn write_live_state(&self, content: &str) -> Result<()> {
        fs::write(self.live_state_path(), content)?;
        Ok(())
    }

    /// Read the profile record straight from disk.
    pub fn record(&self) -> Result<ProfileConfig> {
        let content = fs::read_to_string(&self.profile_config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn record_exists(&self) -> bool {
        self.profile_config_path.exists()
    }

    pub fn archives(&self) -> Vec<PathBuf> {
        let mut archives: Vec<PathBuf> = fs::read_dir(&self.backup_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok().map(|e| e.path()))
                    .filter(|p| p.extension().is_some_and(|ext| ext == "zip"))
                    .collect()
            })
            .unwrap_or_default();
        archives.sort();
        archives
    }

    // ==================== Assertions ====================

    pub fn assert_active_profile(&self, expected: &str) {
        let record = self.record().expect("profile record should be readable");
        assert_eq!(
            record.active_profile, expected,
            "Active profile should be '{}'",
            expected
        );
    }

    pub fn assert_profiles(&self, expected: &[&str]) {
        let record = self.record().expect("profile record should be readable");
        assert_eq!(record.profiles, expected, "Unexpected profile list");
    }

    /// Every listed profile has a snapshot on disk.
    pub fn assert_snapshots_exist(&self) {
        let record = self.record().expect("profile record should be readable");
        for profile in &record.profiles {
            assert!(
                self.snapshot_path(profile).exists(),
                "Snapshot for '{}' should exist",
                profile
            );
        }
    }

    pub fn assert_live_state(&self, expected: &str) {
        assert_eq!(
            self.live_state().as_deref(),
            Some(expected),
            "Live state content mismatch"
        );
    }
}

/// Builder for `TestEnv`.
#[derive(Default)]
pub struct TestEnvBuilder {
    live_state: Option<String>,
    record: Option<(String, Vec<String>)>,
    snapshots: Vec<(String, String)>,
    app_files: Vec<(String, String)>,
    skip_app_dir: bool,
}

#[allow(dead_code)]
impl TestEnvBuilder {
    /// Write `state.json` with the given content.
    pub fn with_live_state(mut self, content: &str) -> Self {
        self.live_state = Some(content.to_string());
        self
    }

    /// Write a profile record.
    pub fn with_record(mut self, active: &str, profiles: &[&str]) -> Self {
        self.record = Some((
            active.to_string(),
            profiles.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }

    /// Write `state-<profile>.json`.
    pub fn with_snapshot(mut self, profile: &str, content: &str) -> Self {
        self.snapshots.push((profile.to_string(), content.to_string()));
        self
    }

    /// Write an arbitrary file under the launcher directory.
    pub fn with_app_file(mut self, relative: &str, content: &str) -> Self {
        self.app_files.push((relative.to_string(), content.to_string()));
        self
    }

    /// Do not create the launcher directory at all.
    pub fn without_app_dir(mut self) -> Self {
        self.skip_app_dir = true;
        self
    }

    pub fn build(self) -> Result<TestEnv> {
        let temp_dir = TempDir::new()?;
        let home_dir = temp_dir.path().join("home");
        let app_dir = home_dir.join("EVE Online");
        let backup_dir = home_dir.join("backups");
        let profile_config_path = home_dir.join("eve-launch-manager.json");

        fs::create_dir_all(&home_dir)?;
        if !self.skip_app_dir {
            fs::create_dir_all(&app_dir)?;
        }

        if let Some(content) = &self.live_state {
            fs::write(app_dir.join("state.json"), content)?;
        }
        for (profile, content) in &self.snapshots {
            fs::write(app_dir.join(format!("state-{}.json", profile)), content)?;
        }
        for (relative, content) in &self.app_files {
            write_file(&app_dir.join(relative), content)?;
        }
        if let Some((active, profiles)) = self.record {
            let record = ProfileConfig {
                active_profile: active,
                profiles,
            };
            fs::write(&profile_config_path, serde_json::to_string_pretty(&record)?)?;
        }

        Ok(TestEnv {
            temp_dir,
            home_dir,
            app_dir,
            backup_dir,
            profile_config_path,
        })
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Probe with a fixed answer.
#[allow(dead_code)]
pub struct FixedProbe(pub bool);

impl ProcessProbe for FixedProbe {
    fn is_running(&mut self) -> Result<bool> {
        Ok(self.0)
    }
}
