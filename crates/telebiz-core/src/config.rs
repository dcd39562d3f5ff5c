//! Shared configuration for Telebiz.
//!
//! Locates the state directory and the files the core reads at startup.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.telebiz/
//! ├── logs/         # Application logs
//! └── config/       # User configuration files
//!     ├── forms.json    # Form catalog override
//!     └── .env.local    # API URL and token
//! ```
//!
//! # Environment Variables
//!
//! - `TELEBIZ_STATE_DIR`: Override the base state directory
//! - `TELEBIZ_CONFIG_DIR`: Override the config directory
//! - `TELEBIZ_LOG_DIR`: Override the log directory

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::debug;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "TELEBIZ_STATE_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "TELEBIZ_CONFIG_DIR";

/// Environment variable for custom log directory.
pub const LOG_DIR_ENV: &str = "TELEBIZ_LOG_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".telebiz";

const CONFIG_SUBDIR: &str = "config";
const LOGS_SUBDIR: &str = "logs";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Telebiz state directory.
///
/// The state directory is determined by:
/// 1. `TELEBIZ_STATE_DIR` environment variable if set
/// 2. `~/.telebiz` if home directory is available
/// 3. `.telebiz` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the user config directory.
///
/// Defaults to `~/.telebiz/config/` or `TELEBIZ_CONFIG_DIR` env var.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(CONFIG_SUBDIR))
}

/// Get the logs directory.
pub fn logs_dir() -> PathBuf {
    std::env::var(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(LOGS_SUBDIR))
}

/// Form catalog override file.
pub fn forms_catalog_file() -> PathBuf {
    config_dir().join("forms.json")
}

/// Environment file for secrets (API URL, token).
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Loads `.env.local` from the config directory if it exists.
///
/// Variables already present in the process environment win.
pub fn load_env() {
    let path = env_file();
    if path.exists() {
        match dotenvy::from_path(&path) {
            Ok(()) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("Ignoring unreadable {}: {}", path.display(), e),
        }
    }
}

/// Ensure the config directory exists.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_config_dir() -> std::io::Result<()> {
    let dir = config_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables can't be isolated across parallel tests, so
    // these check file and directory names rather than full paths.

    #[test]
    fn test_state_dir_name() {
        let dir = state_dir();
        assert!(dir.is_absolute() || dir.ends_with(".telebiz"));
    }

    #[test]
    fn test_config_dir_name() {
        let dir = config_dir();
        assert!(dir.ends_with("config") || dir.to_string_lossy().contains("config"));
    }

    #[test]
    fn test_logs_dir_name() {
        let dir = logs_dir();
        assert!(dir.ends_with("logs") || dir.to_string_lossy().contains("logs"));
    }

    #[test]
    fn test_forms_catalog_file_name() {
        assert!(forms_catalog_file().ends_with("forms.json"));
    }

    #[test]
    fn test_env_file_name() {
        assert!(env_file().ends_with(".env.local"));
    }

    #[test]
    fn test_load_env_without_file_is_noop() {
        load_env();
    }
}
