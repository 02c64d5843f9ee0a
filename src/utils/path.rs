use std::path::{Path, PathBuf};

/// Directory and file stem used for settings and logs
pub const APP_NAME: &str = "eve-launch-manager";

/// Profile record file name, stored directly in the home directory
pub const PROFILE_CONFIG_FILE: &str = "eve-launch-manager.json";

/// Get the home directory, with fallback to "/"
pub fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Get the settings directory path (always ~/.config/eve-launch-manager, regardless of OS)
pub fn get_config_dir() -> PathBuf {
    get_home_dir().join(".config").join(APP_NAME)
}

/// Get the settings file path (always ~/.config/eve-launch-manager/settings.toml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("settings.toml")
}

/// Get the profile record path (~/eve-launch-manager.json)
pub fn get_profile_config_path() -> PathBuf {
    get_home_dir().join(PROFILE_CONFIG_FILE)
}

/// Default location of the launcher's data directory
pub fn default_app_dir() -> PathBuf {
    get_home_dir()
        .join("AppData")
        .join("Roaming")
        .join("EVE Online")
}

/// Directory that receives the rolling log file
pub fn get_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(get_home_dir)
        .join(APP_NAME)
}

/// Expand a path string, handling ~ and relative paths
///
/// # Arguments
/// * `path_str` - Path string that may contain ~ or be relative
///
/// # Returns
/// Expanded PathBuf
pub fn expand_path(path_str: &str) -> PathBuf {
    let home_dir = get_home_dir();

    if let Some(rest) = path_str.strip_prefix("~/") {
        home_dir.join(rest)
    } else if path_str == "~" {
        home_dir
    } else if Path::new(path_str).is_absolute() {
        PathBuf::from(path_str)
    } else {
        // Relative path - join with home directory
        home_dir.join(path_str)
    }
}

/// Format a path for display (show ~ for home)
pub fn format_path_for_display(path: &Path) -> String {
    let home_dir = get_home_dir();

    if let Ok(relative) = path.strip_prefix(&home_dir) {
        if relative.as_os_str().is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", relative.to_string_lossy())
        }
    } else {
        path.to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_home_relative() {
        let home = get_home_dir();
        assert_eq!(expand_path("~"), home);
        assert_eq!(expand_path("~/games"), home.join("games"));
        assert_eq!(expand_path("games"), home.join("games"));
    }

    #[test]
    fn test_format_path_for_display() {
        let home = get_home_dir();
        assert_eq!(format_path_for_display(&home), "~");
        assert_eq!(
            format_path_for_display(&home.join("eve-settings.zip")),
            "~/eve-settings.zip"
        );
    }

    #[test]
    fn test_profile_config_lives_in_home() {
        assert_eq!(
            get_profile_config_path(),
            get_home_dir().join("eve-launch-manager.json")
        );
    }
}
