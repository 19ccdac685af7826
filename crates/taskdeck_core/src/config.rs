//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve the storage path and logging options for one process.
//!
//! # Invariants
//! - Blank environment values behave as if unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TASKDECK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TASKDECK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TASKDECK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "taskdeck.sqlite3";

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the key-value store.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `TASKDECK_*` variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_defaults() {
        let config = CoreConfig::from_lookup(|key| match key {
            DB_PATH_ENV => Some("/data/tasks.sqlite3".to_string()),
            LOG_LEVEL_ENV => Some("warn".to_string()),
            LOG_DIR_ENV => Some("/data/logs".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/data/tasks.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/data/logs")));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = CoreConfig::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(config, CoreConfig::default());
    }
}
