//! Profile store: the persisted profile record and the snapshot copies.
//!
//! The launcher reads a single live state file (`state.json`). Every known
//! profile keeps its own snapshot next to it (`state-<name>.json`). The
//! store moves bytes between the two and keeps the profile record
//! (`eve-launch-manager.json`) in step with what is on disk.
//!
//! # Ordering
//!
//! - Creating a profile writes the snapshot before the record, so the record
//!   never names a snapshot that does not exist.
//! - Switching archives the live file into the outgoing snapshot, installs
//!   the incoming snapshot as the live file, then commits the new active
//!   name. Each individual file write is atomic (temp file + rename), but a
//!   crash between the install and the commit leaves the live file holding
//!   the new profile while the record still names the old one.

use crate::utils::profile_validation::validate_profile_name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the live state file the launcher reads
pub const LIVE_STATE_FILE: &str = "state.json";

/// Profile created on first run
pub const DEFAULT_PROFILE: &str = "main";

/// Contents of a snapshot created without a base profile
const EMPTY_SNAPSHOT: &[u8] = b"{}";

/// The persisted profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfig {
    /// Profile whose snapshot currently backs the live state file
    pub active_profile: String,
    /// Known profiles, in creation order
    pub profiles: Vec<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            active_profile: DEFAULT_PROFILE.to_string(),
            profiles: vec![DEFAULT_PROFILE.to_string()],
        }
    }
}

impl ProfileConfig {
    /// Check if a profile with this exact name is registered
    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.iter().any(|p| p == name)
    }

    /// Check the record invariants: active profile listed, no duplicates.
    fn check(&self) -> std::result::Result<(), String> {
        if !self.has_profile(&self.active_profile) {
            return Err(format!(
                "active profile '{}' is not in the profile list",
                self.active_profile
            ));
        }
        for (i, name) in self.profiles.iter().enumerate() {
            if self.profiles[..i].contains(name) {
                return Err(format!("profile '{}' is listed more than once", name));
            }
        }
        Ok(())
    }

    /// Serialize the way the record is stored on disk (tab-indented JSON).
    fn to_pretty_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(out)
    }
}

/// Broad category of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected profile name; nothing on disk was touched
    Validation,
    /// Reading or writing the record or a snapshot failed
    Io,
}

/// Failure of a profile store operation.
#[derive(Debug)]
pub enum StoreError {
    /// The requested profile name is not acceptable
    Validation(String),
    /// A file operation failed
    Io { context: String, source: io::Error },
    /// The profile record exists but cannot be understood
    Malformed { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Io { .. } | Self::Malformed { .. } => ErrorKind::Io,
        }
    }

    fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{}", message),
            Self::Io { context, source } => write!(f, "{}: {}", context, source),
            Self::Malformed { path, reason } => {
                write!(f, "Malformed profile config {:?}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Where the store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// The profile record (JSON)
    pub config_path: PathBuf,
    /// The launcher's data directory holding the live file and snapshots
    pub app_dir: PathBuf,
}

impl StorePaths {
    pub fn new(config_path: impl Into<PathBuf>, app_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            app_dir: app_dir.into(),
        }
    }

    /// The file the launcher actually reads
    pub fn live_state_path(&self) -> PathBuf {
        self.app_dir.join(LIVE_STATE_FILE)
    }

    /// Snapshot file for a profile
    pub fn snapshot_path(&self, profile_name: &str) -> PathBuf {
        self.app_dir.join(format!("state-{}.json", profile_name))
    }
}

/// Owner of the profile record and the snapshot files.
#[derive(Debug)]
pub struct ProfileStore {
    paths: StorePaths,
    config: ProfileConfig,
}

impl ProfileStore {
    /// Load the profile record, initializing it on first run.
    ///
    /// When no record exists yet, the current live state is copied into the
    /// `main` snapshot and a default record naming `main` is written.
    pub fn load(paths: StorePaths) -> Result<Self> {
        let config_path = &paths.config_path;

        let config = if config_path.exists() {
            let content = fs::read(config_path).map_err(|e| {
                StoreError::io(format!("Failed to read profile config {:?}", config_path), e)
            })?;
            let config: ProfileConfig =
                serde_json::from_slice(&content).map_err(|e| StoreError::Malformed {
                    path: config_path.clone(),
                    reason: e.to_string(),
                })?;
            config.check().map_err(|reason| StoreError::Malformed {
                path: config_path.clone(),
                reason,
            })?;
            debug!(
                "Loaded profile config with {} profiles (active: {})",
                config.profiles.len(),
                config.active_profile
            );
            config
        } else {
            let config = ProfileConfig::default();
            copy_file(
                &paths.live_state_path(),
                &paths.snapshot_path(&config.active_profile),
            )
            .map_err(|e| {
                StoreError::io(
                    format!(
                        "Failed to copy live state into the '{}' profile",
                        config.active_profile
                    ),
                    e,
                )
            })?;
            write_config(config_path, &config)?;
            info!("Initialized profile config at {:?}", config_path);
            config
        };

        Ok(Self { paths, config })
    }

    /// Current profile record
    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Create a new profile, optionally copying another profile's snapshot.
    ///
    /// # Arguments
    ///
    /// * `name` - Name for the new profile.
    /// * `base` - Profile whose snapshot seeds the new one, or `None` for an
    ///   empty state.
    ///
    /// Names are compared case-insensitively against existing profiles:
    /// `Main` is rejected when `main` exists, since both would map to the
    /// same snapshot file on a case-insensitive filesystem.
    pub fn create_profile(&mut self, name: &str, base: Option<&str>) -> Result<()> {
        validate_profile_name(name, &self.config.profiles)
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let contents = match base {
            Some(base) => {
                let base_path = self.paths.snapshot_path(base);
                fs::read(&base_path).map_err(|e| {
                    StoreError::io(format!("Failed to read snapshot of profile '{}'", base), e)
                })?
            }
            None => EMPTY_SNAPSHOT.to_vec(),
        };

        write_atomic(&self.paths.snapshot_path(name), &contents).map_err(|e| {
            StoreError::io(format!("Failed to write snapshot of profile '{}'", name), e)
        })?;

        let mut updated = self.config.clone();
        updated.profiles.push(name.to_string());
        write_config(&self.paths.config_path, &updated)?;
        self.config = updated;

        info!(
            "Created profile '{}' (base: {})",
            name,
            base.unwrap_or("none")
        );
        Ok(())
    }

    /// Make `name` the active profile.
    ///
    /// The live state is archived into the outgoing profile's snapshot
    /// first. If that fails nothing has changed. If installing the incoming
    /// snapshot fails, the outgoing snapshot is already refreshed but the
    /// live file and the record still describe the outgoing profile.
    pub fn switch_profile(&mut self, name: &str) -> Result<()> {
        if !self.config.has_profile(name) {
            return Err(StoreError::io(
                format!("Cannot switch to profile '{}'", name),
                io::Error::new(io::ErrorKind::NotFound, "profile does not exist"),
            ));
        }

        let previous = self.config.active_profile.clone();
        let live_path = self.paths.live_state_path();

        copy_file(&live_path, &self.paths.snapshot_path(&previous)).map_err(|e| {
            StoreError::io(
                format!("Failed to archive live state into profile '{}'", previous),
                e,
            )
        })?;

        copy_file(&self.paths.snapshot_path(name), &live_path).map_err(|e| {
            StoreError::io(format!("Failed to install snapshot of profile '{}'", name), e)
        })?;

        let mut updated = self.config.clone();
        updated.active_profile = name.to_string();
        write_config(&self.paths.config_path, &updated)?;
        self.config = updated;

        info!("Switched from '{}' to '{}'", previous, name);
        Ok(())
    }
}

/// Rewrite the whole profile record.
fn write_config(path: &Path, config: &ProfileConfig) -> Result<()> {
    let content = config
        .to_pretty_json()
        .map_err(|e| serialize_error(path, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            StoreError::io(format!("Failed to create config directory {:?}", parent), e)
        })?;
    }

    write_atomic(path, &content)
        .map_err(|e| StoreError::io(format!("Failed to write profile config {:?}", path), e))
}

fn serialize_error(path: &Path, e: serde_json::Error) -> StoreError {
    StoreError::io(
        format!("Failed to serialize profile config for {:?}", path),
        e.into(),
    )
}

/// Copy `src` over `dst` so that `dst` is never observed half-written.
fn copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    let contents = fs::read(src)?;
    write_atomic(dst, &contents)
}

/// Write to a sibling temp file, then rename it into place.
fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(live: &str) -> (TempDir, StorePaths) {
        let temp = TempDir::new().unwrap();
        let app_dir = temp.path().join("EVE Online");
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join(LIVE_STATE_FILE), live).unwrap();
        let paths = StorePaths::new(temp.path().join("eve-launch-manager.json"), app_dir);
        (temp, paths)
    }

    #[test]
    fn test_first_load_creates_defaults() {
        let (_temp, paths) = setup(r#"{"accounts":1}"#);

        let store = ProfileStore::load(paths.clone()).unwrap();
        assert_eq!(store.config(), &ProfileConfig::default());
        assert!(paths.config_path.exists());
        assert_eq!(
            fs::read_to_string(paths.snapshot_path("main")).unwrap(),
            r#"{"accounts":1}"#
        );
    }

    #[test]
    fn test_first_load_without_live_state_fails() {
        let (_temp, paths) = setup("{}");
        fs::remove_file(paths.live_state_path()).unwrap();

        let err = ProfileStore::load(paths.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!paths.config_path.exists());
    }

    #[test]
    fn test_record_is_tab_indented_camel_case() {
        let (_temp, paths) = setup("{}");
        ProfileStore::load(paths.clone()).unwrap();

        let raw = fs::read_to_string(&paths.config_path).unwrap();
        assert!(raw.contains("\t\"activeProfile\": \"main\""));
        assert!(raw.contains("\"profiles\""));
    }

    #[test]
    fn test_load_ignores_unknown_fields() {
        let (_temp, paths) = setup("{}");
        fs::write(
            &paths.config_path,
            r#"{"version":1,"activeProfile":"alt","profiles":["main","alt"]}"#,
        )
        .unwrap();

        let store = ProfileStore::load(paths).unwrap();
        assert_eq!(store.config().active_profile, "alt");
        assert_eq!(store.config().profiles, vec!["main", "alt"]);
    }

    #[test]
    fn test_load_rejects_malformed_record() {
        let (_temp, paths) = setup("{}");

        fs::write(&paths.config_path, "not json").unwrap();
        let err = ProfileStore::load(paths.clone()).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);

        fs::write(
            &paths.config_path,
            r#"{"activeProfile":"ghost","profiles":["main"]}"#,
        )
        .unwrap();
        assert!(ProfileStore::load(paths.clone()).is_err());

        fs::write(
            &paths.config_path,
            r#"{"activeProfile":"main","profiles":["main","main"]}"#,
        )
        .unwrap();
        assert!(ProfileStore::load(paths).is_err());
    }

    #[test]
    fn test_create_profile_from_base_copies_snapshot() {
        let (_temp, paths) = setup(r#"{"main":true}"#);
        let mut store = ProfileStore::load(paths.clone()).unwrap();

        store.create_profile("alt", Some("main")).unwrap();
        assert_eq!(
            fs::read_to_string(paths.snapshot_path("alt")).unwrap(),
            r#"{"main":true}"#
        );
        assert_eq!(store.config().profiles, vec!["main", "alt"]);
    }

    #[test]
    fn test_create_profile_without_base_is_empty_object() {
        let (_temp, paths) = setup("{}");
        let mut store = ProfileStore::load(paths.clone()).unwrap();

        store.create_profile("fresh", None).unwrap();
        assert_eq!(fs::read_to_string(paths.snapshot_path("fresh")).unwrap(), "{}");
    }

    #[test]
    fn test_create_profile_with_missing_base_fails_before_writing() {
        let (_temp, paths) = setup("{}");
        let mut store = ProfileStore::load(paths.clone()).unwrap();

        let err = store.create_profile("alt", Some("ghost")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!paths.snapshot_path("alt").exists());
        assert_eq!(store.config().profiles, vec!["main"]);
    }

    #[test]
    fn test_switch_to_unknown_profile_is_io_error() {
        let (_temp, paths) = setup("{}");
        let mut store = ProfileStore::load(paths).unwrap();

        let err = store.switch_profile("ghost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(store.config().active_profile, "main");
    }

    #[test]
    fn test_switch_archives_outgoing_live_state() {
        let (_temp, paths) = setup("v1");
        let mut store = ProfileStore::load(paths.clone()).unwrap();
        store.create_profile("alt", None).unwrap();

        // Launcher modified the live file while "main" was active
        fs::write(paths.live_state_path(), "v2").unwrap();
        store.switch_profile("alt").unwrap();

        assert_eq!(fs::read_to_string(paths.snapshot_path("main")).unwrap(), "v2");
        assert_eq!(fs::read_to_string(paths.live_state_path()).unwrap(), "{}");
        assert_eq!(store.config().active_profile, "alt");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("state.json");
        write_atomic(&target, b"data").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("state.json")]);
    }

    #[test]
    fn test_store_error_display_and_source() {
        let err = StoreError::io(
            "Failed to read",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "Failed to read: gone");
        assert!(std::error::Error::source(&err).is_some());

        let err = StoreError::Validation("bad".to_string());
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_serialize_failure_is_io_not_malformed() {
        let json_err = serde_json::from_str::<ProfileConfig>("{").unwrap_err();
        let err = serialize_error(Path::new("/cfg/profiles.json"), json_err);

        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().starts_with("Failed to serialize profile config"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_create_profile_rejects_case_variant_of_existing_name() {
        let (_temp, paths) = setup("{}");
        let mut store = ProfileStore::load(paths.clone()).unwrap();

        let err = store.create_profile("Main", None).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "A profile with the name 'Main' already exists");
        assert_eq!(store.config().profiles, vec!["main"]);
    }
}
