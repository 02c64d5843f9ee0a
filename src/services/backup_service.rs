//! Zip backups of the launcher's state files.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use regex::Regex;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive file name prefix; the timestamp and `.zip` follow
const ARCHIVE_PREFIX: &str = "eve-settings-";

/// Timestamp format used in archive names (minute resolution)
const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// File names picked up by a backup. Unanchored at the start, ASCII word
/// characters only.
const STATE_FILE_PATTERN: &str = r"state[A-Za-z0-9_-]*\.json$";

/// Creates timestamped archives of every state file under the launcher directory.
#[derive(Debug, Clone)]
pub struct BackupService {
    app_dir: PathBuf,
    backup_dir: PathBuf,
}

impl BackupService {
    pub fn new(app_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Archive path for a backup taken at `now`.
    ///
    /// Two backups within the same minute share a name; the later one wins.
    pub fn archive_path(&self, now: DateTime<Local>) -> PathBuf {
        self.backup_dir.join(format!(
            "{}{}.zip",
            ARCHIVE_PREFIX,
            now.format(ARCHIVE_TIMESTAMP_FORMAT)
        ))
    }

    /// Create a backup stamped with the current local time.
    pub fn create_backup(&self) -> Result<PathBuf> {
        self.create_backup_at(Local::now())
    }

    /// Create a backup archive and return its path.
    ///
    /// A directory with no state files still yields a valid, empty archive.
    /// On failure the partial archive is removed.
    pub fn create_backup_at(&self, now: DateTime<Local>) -> Result<PathBuf> {
        if !self.app_dir.is_dir() {
            bail!("Launcher directory not found: {:?}", self.app_dir);
        }

        let files = self.collect_state_files()?;
        debug!("Found {} state files to back up", files.len());

        fs::create_dir_all(&self.backup_dir)
            .with_context(|| format!("Failed to create backup directory {:?}", self.backup_dir))?;

        let archive_path = self.archive_path(now);
        if let Err(e) = self.write_archive(&archive_path, &files) {
            if let Err(remove_err) = fs::remove_file(&archive_path) {
                if remove_err.kind() != io::ErrorKind::NotFound {
                    warn!(
                        "Failed to remove partial archive {:?}: {}",
                        archive_path, remove_err
                    );
                }
            }
            return Err(e);
        }

        info!(
            "Backed up {} state files to {:?}",
            files.len(),
            archive_path
        );
        Ok(archive_path)
    }

    /// Every file under the launcher directory whose name looks like a state file.
    fn collect_state_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.app_dir).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to scan {:?}", self.app_dir))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(is_state_file_name);
            if matches {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn write_archive(&self, archive_path: &Path, files: &[PathBuf]) -> Result<()> {
        let file = File::create(archive_path)
            .with_context(|| format!("Failed to create archive {:?}", archive_path))?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for path in files {
            let entry_name = self.entry_name(path);
            zip.start_file(entry_name.as_str(), options)
                .with_context(|| format!("Failed to add {} to archive", entry_name))?;
            let mut source =
                File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
            io::copy(&mut source, &mut zip)
                .with_context(|| format!("Failed to write {} into archive", entry_name))?;
        }

        zip.finish().context("Failed to finalize archive")?;
        Ok(())
    }

    /// Archive entry name: the path relative to the launcher directory's
    /// parent, so entries keep the directory name (`EVE Online/state.json`).
    fn entry_name(&self, path: &Path) -> String {
        let root = self.app_dir.parent().unwrap_or(&self.app_dir);
        let relative = path.strip_prefix(root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Check if a file name matches the state-file pattern.
///
/// `launcherstate.json` counts too.
pub fn is_state_file_name(name: &str) -> bool {
    static STATE_FILE_RE: OnceLock<Regex> = OnceLock::new();
    STATE_FILE_RE
        .get_or_init(|| Regex::new(STATE_FILE_PATTERN).expect("valid state file regex"))
        .is_match(name)
}
