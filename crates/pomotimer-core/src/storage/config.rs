//! TOML-based application configuration.
//!
//! Stores front-end preferences only:
//! - What the terminal widget shows (mode label, control labels)
//! - Key words bound to the toggle/reset/quit intents
//! - Log filter
//!
//! Session durations are fixed by [`crate::timer::Mode`] and are not
//! configurable. Configuration is stored at `~/.config/pomotimer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Terminal widget configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_mode: bool,
    #[serde(default = "default_true")]
    pub show_controls: bool,
}

/// Input words for the two controls and for leaving the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysConfig {
    #[serde(default = "default_toggle_key")]
    pub toggle: String,
    #[serde(default = "default_reset_key")]
    pub reset: String,
    #[serde(default = "default_quit_key")]
    pub quit: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `pomotimer_core=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomotimer/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_true() -> bool {
    true
}
fn default_toggle_key() -> String {
    "s".into()
}
fn default_reset_key() -> String {
    "r".into()
}
fn default_quit_key() -> String {
    "q".into()
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_mode: true,
            show_controls: true,
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            toggle: default_toggle_key(),
            reset: default_reset_key(),
            quit: default_quit_key(),
        }
    }
}

impl KeysConfig {
    /// Words that always press Start/Pause, besides `toggle` and an empty line.
    pub const TOGGLE_WORDS: &'static [&'static str] = &["start", "pause", "toggle"];
    /// Words that always press Reset, besides `reset`.
    pub const RESET_WORDS: &'static [&'static str] = &["reset"];
    /// Words that always quit, besides `quit`.
    pub const QUIT_WORDS: &'static [&'static str] = &["quit", "exit"];

    /// Every configured key must belong to exactly one control: no two keys
    /// may be equal, and no key may be another control's built-in word.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let controls = [
            ("toggle", &self.toggle, Self::TOGGLE_WORDS),
            ("reset", &self.reset, Self::RESET_WORDS),
            ("quit", &self.quit, Self::QUIT_WORDS),
        ];

        for (name, key, _) in &controls {
            let key = key.trim().to_ascii_lowercase();
            for (other, other_key, other_words) in &controls {
                if other == name {
                    continue;
                }
                let clashes = key == other_key.trim().to_ascii_lowercase()
                    || other_words.iter().any(|w| *w == key);
                if clashes {
                    return Err(ConfigError::InvalidValue {
                        key: format!("keys.{name}"),
                        message: format!("'{key}' is already bound to {other}"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(format!("expected true or false: {e}")))?,
                ),
                serde_json::Value::Object(_) => return Err(invalid("key names a section".into())),
                _ => {
                    if value.trim().is_empty() {
                        return Err(invalid("value must not be empty".into()));
                    }
                    serde_json::Value::String(value.into())
                }
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.keys.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
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
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Where [`load`](Self::load) and [`save`](Self::save) read and write.
    pub fn location() -> Result<PathBuf, ConfigError> {
        Self::path()
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

    /// Set a value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or a key binding would collide with another control.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.keys.validate()?;
        *self = updated;
        Ok(())
    }

}
