//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work and rest interval lengths and the long-rest cadence
//! - Whether phase changes ring the terminal bell
//! - The default log filter
//!
//! Configuration is stored at `~/.config/tomatick/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{data_dir, resolve_data_dir};
use crate::error::ConfigError;
use crate::timer::PomodoroConfig;

/// Interval lengths, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_work_secs")]
    pub work_secs: u64,
    #[serde(default = "default_short_rest_secs")]
    pub short_rest_secs: u64,
    #[serde(default = "default_long_rest_secs")]
    pub long_rest_secs: u64,
    #[serde(default = "default_cycles_per_long_rest")]
    pub cycles_per_long_rest: u32,
}

/// Alert configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Logging configuration. `TOMATICK_LOG` takes precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tomatick/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerSettings,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_work_secs() -> u64 {
    25 * 60
}
fn default_short_rest_secs() -> u64 {
    5 * 60
}
fn default_long_rest_secs() -> u64 {
    15 * 60
}
fn default_cycles_per_long_rest() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_log_filter() -> String {
    "warn".into()
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_secs: default_work_secs(),
            short_rest_secs: default_short_rest_secs(),
            long_rest_secs: default_long_rest_secs(),
            cycles_per_long_rest: default_cycles_per_long_rest(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self { bell: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl TimerSettings {
    /// Validate into an engine config. Keys in errors are dot paths.
    pub fn pomodoro(&self) -> Result<PomodoroConfig, ConfigError> {
        PomodoroConfig::new(
            self.work_secs,
            self.short_rest_secs,
            self.long_rest_secs,
            self.cycles_per_long_rest,
        )
        .map_err(|e| match e {
            ConfigError::InvalidValue { key, message } => ConfigError::InvalidValue {
                key: format!("timer.{key}"),
                message,
            },
            other => other,
        })
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| ConfigError::invalid(key, format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(ConfigError::invalid(
                                key,
                                format!("cannot parse '{value}' as a non-negative integer"),
                            ));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(ConfigError::invalid(key, "is a section, not a value"));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Where `load` and `save` read and write.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Self::path()
    }

    /// Load from the data directory, writing defaults if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match Self::read_from(path)? {
            Some(cfg) => Ok(cfg),
            None => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Read the config file if there is one. Never creates or writes
    /// anything, so it is safe to call before any command has run.
    pub fn peek() -> Result<Option<Self>, ConfigError> {
        Self::read_from(&resolve_data_dir()?.join("config.toml"))
    }

    /// Read `path` if it exists, without writing defaults.
    pub fn read_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory. Call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result is not a valid timer configuration. On error `self`
    /// is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)
            .map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        updated.timer.pomodoro()?;
        *self = updated;
        Ok(())
    }

    /// Validated engine configuration.
    pub fn pomodoro(&self) -> Result<PomodoroConfig, ConfigError> {
        self.timer.pomodoro()
    }
}
