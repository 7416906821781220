//! Path resolution for arxive files.
//!
//! Provides XDG-compliant config location and the installation-relative
//! session log location.

use std::env;
use std::path::PathBuf;

/// File name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "arxive";

/// File name of the session log.
pub const LOG_FILE_NAME: &str = "session.log";

/// Get the per-user configuration directory.
///
/// Uses `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`. Returns
/// `None` when neither is set.
pub fn get_config_dir() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}

/// Get the configuration file path (`~/.config/arxive`).
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Get the session log path next to the installation.
///
/// For an executable at `<prefix>/bin/arxive` this is
/// `<prefix>/session.log`; otherwise the log sits beside the executable.
/// Falls back to the working directory when the executable path is unknown.
pub fn get_log_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(install_dir))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

fn install_dir(exe_dir: &std::path::Path) -> PathBuf {
    match (exe_dir.file_name(), exe_dir.parent()) {
        (Some(name), Some(parent)) if name == "bin" => parent.to_path_buf(),
        _ => exe_dir.to_path_buf(),
    }
}
