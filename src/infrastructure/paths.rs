//! Platform paths for configuration and trace output.
//!
//! Locations follow the platform conventions exposed by `dirs`, with a
//! `pixfeed` subdirectory. When the platform reports no suitable directory
//! (e.g. `HOME` unset in a container) the system temp dir is used instead.

use std::path::PathBuf;

const APP_DIR: &str = "pixfeed";

/// Returns the data directory holding trace files.
///
/// Typically `~/.local/share/pixfeed` on Linux and
/// `~/Library/Application Support/pixfeed` on macOS.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Returns the default configuration file path.
///
/// Typically `~/.config/pixfeed/config.toml` on Linux.
#[must_use]
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("config.toml")
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when no home directory is
/// known, are returned unchanged.
///
/// # Examples
///
/// ```
/// use pixfeed::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/etc/pixfeed.toml"), std::path::PathBuf::from("/etc/pixfeed.toml"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };
    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
