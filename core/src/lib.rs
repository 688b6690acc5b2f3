use std::{path::PathBuf, time::Duration};

pub mod catalog;
pub mod config;
pub mod errors;
pub mod logger;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

use errors::DirectoryError;

/// Get the directory the config file lives in.
///
/// | Platform | Value                                                         |
/// | -------- | ------------------------------------------------------------- |
/// | Linux    | `$XDG_CONFIG_HOME/discotheque` or `$HOME/.config/discotheque` |
/// | macOS    | `$HOME/Library/Application Support/discotheque`               |
/// | Windows  | `{FOLDERID_RoamingAppData}\discotheque\config`                |
///
/// # Errors
///
/// Returns [`DirectoryError::Config`] if no home directory could be found.
pub fn get_config_dir() -> Result<PathBuf, DirectoryError> {
    directories::ProjectDirs::from("", "", "discotheque")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(DirectoryError::Config)
}

/// Get the directory the catalog's data lives in.
///
/// | Platform | Value                                                            |
/// | -------- | ---------------------------------------------------------------- |
/// | Linux    | `$XDG_DATA_HOME/discotheque` or `$HOME/.local/share/discotheque` |
/// | macOS    | `$HOME/Library/Application Support/discotheque`                  |
/// | Windows  | `{FOLDERID_RoamingAppData}\discotheque\data`                     |
///
/// # Errors
///
/// Returns [`DirectoryError::Data`] if no home directory could be found.
pub fn get_data_dir() -> Result<PathBuf, DirectoryError> {
    directories::ProjectDirs::from("", "", "discotheque")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(DirectoryError::Data)
}

/// Format a duration as `m:ss`, or `h:mm:ss` once it reaches an hour.
#[must_use]
pub fn format_duration(duration: &Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
