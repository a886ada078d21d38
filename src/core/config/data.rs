use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`. Every key is optional; anything left unset
/// falls through to the environment and then to built-in defaults.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Model identifier sent with every live request
    pub model: Option<String>,
    /// API base URL; `chat/completions` is appended to it
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Context length (messages) past which the session logs a warning
    pub context_warn_threshold: Option<usize>,
    /// Append the transcript to this file
    pub log_file: Option<PathBuf>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths under the home directory to `~` notation on Unix-like systems
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            if let Ok(relative) = path.strip_prefix(PathBuf::from(home)) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
