mod config;

pub use config::{AlertsConfig, Config, LoggingConfig, TimerSettings};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `TOMATICK_HOME` wins when set. Otherwise `~/.config/tomatick[-dev]/`,
/// with the `-dev` suffix when `TOMATICK_ENV=dev`.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = resolve_data_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Where the data directory is, without touching the filesystem.
pub(crate) fn resolve_data_dir() -> Result<PathBuf, ConfigError> {
    match std::env::var_os("TOMATICK_HOME") {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => {
            let base_dir = dirs::home_dir().ok_or(ConfigError::NoDataDir)?.join(".config");
            let env = std::env::var("TOMATICK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                Ok(base_dir.join("tomatick-dev"))
            } else {
                Ok(base_dir.join("tomatick"))
            }
        }
    }
}
