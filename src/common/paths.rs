//! Configuration and data paths

use std::path::PathBuf;

/// Name used for platform directories
const APP_NAME: &str = "burnham";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/burnham/`
/// - macOS: `~/Library/Application Support/burnham/`
/// - Windows: `%APPDATA%\burnham\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the default configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
