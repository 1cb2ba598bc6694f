//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database path, slot key and logging settings for hosts.
//!
//! # Invariants
//! - Blank environment values are treated as absent.
//! - Resolution never touches the file system.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::persistence::DEFAULT_SLOT_KEY;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "MEETBOOK_DB_PATH";
pub const ENV_SLOT_KEY: &str = "MEETBOOK_SLOT_KEY";
pub const ENV_LOG_LEVEL: &str = "MEETBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MEETBOOK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "meetbook.sqlite3";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{ENV_LOG_LEVEL}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the durable slots.
    pub db_path: PathBuf,
    /// Slot key holding the meeting collection.
    pub slot_key: String,
    /// Normalized log level (`trace|debug|info|warn|error`).
    pub log_level: &'static str,
    /// Log directory; file logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Resolves settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves settings through an arbitrary variable lookup.
    ///
    /// # Errors
    /// - `InvalidLogLevel` when the level variable is set but unsupported.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = read(ENV_SLOT_KEY) {
            config.slot_key = key;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_SLOT_KEY};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.slot_key, "meetings");
        assert!(config.db_path.ends_with("meetbook.sqlite3"));
    }

    #[test]
    fn overrides_are_trimmed_and_blank_values_ignored() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /data/m.sqlite3 "),
            (ENV_SLOT_KEY, "   "),
            (ENV_LOG_LEVEL, "WARNING"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/m.sqlite3"));
        assert_eq!(config.slot_key, "meetings");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn unsupported_level_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }
}
