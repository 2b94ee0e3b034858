//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Attendance durations (work hours, break minutes) used by reminders
//! - Notification toggles
//! - AI model selection and the chat history window
//!
//! Configuration lives at `~/.config/lifeobserver/config.toml`. The AI
//! API key itself is kept in the OS keyring, never in this file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Attendance clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    #[serde(default = "default_work_hours")]
    pub work_hours: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub sound: bool,
}

/// AI companion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Model name; the provider is inferred from it (gemini/gpt/mistral/grok).
    #[serde(default = "default_model")]
    pub model: String,
    /// How many recent chat turns accompany each request.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/lifeobserver/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub attendance: AttendanceConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

fn default_work_hours() -> u32 {
    8
}
fn default_break_minutes() -> u32 {
    30
}
fn default_true() -> bool {
    true
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_history_window() -> usize {
    10
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            work_hours: default_work_hours(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: false,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            history_window: default_history_window(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attendance: AttendanceConfig::default(),
            notifications: NotificationsConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the default file on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as a string by dot-separated key
    /// (e.g. `attendance.work_hours`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist. The new value
    /// must parse as the same JSON type the key currently holds.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        set_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        self.save()
    }
}

fn set_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.into(),
        message,
    };

    let (parent_path, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };

    let mut current = root;
    if let Some(parent_path) = parent_path {
        for part in parent_path.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
        }
    }

    let obj = current
        .as_object_mut()
        .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
    let existing = obj
        .get(leaf)
        .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;

    let new_value = match existing {
        serde_json::Value::Bool(_) => serde_json::Value::Bool(
            value
                .parse::<bool>()
                .map_err(|e| invalid(e.to_string()))?,
        ),
        serde_json::Value::Number(_) => {
            if let Ok(n) = value.parse::<u64>() {
                serde_json::Value::Number(n.into())
            } else {
                return Err(invalid(format!("cannot parse '{value}' as number")));
            }
        }
        _ => serde_json::Value::String(value.into()),
    };
    obj.insert(leaf.to_string(), new_value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.attendance.work_hours, 8);
        assert_eq!(parsed.attendance.break_minutes, 30);
        assert_eq!(parsed.ai.history_window, 10);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("attendance.work_hours").as_deref(), Some("8"));
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("ai.model").as_deref(), Some("gemini-2.0-flash"));
        assert!(cfg.get("ai.missing_key").is_none());
    }

    #[test]
    fn set_by_path_updates_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        set_by_path(&mut json, "attendance.work_hours", "6").unwrap();
        assert_eq!(json["attendance"]["work_hours"], 6);
    }

    #[test]
    fn set_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(matches!(
            set_by_path(&mut json, "attendance.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_by_path_rejects_wrong_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(set_by_path(&mut json, "notifications.enabled", "loud").is_err());
        assert!(set_by_path(&mut json, "attendance.break_minutes", "soon").is_err());
    }

    #[test]
    fn empty_config_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.attendance.work_hours, 8);
        assert!(cfg.notifications.enabled);
    }
}
