//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database path, log level and log directory for host processes.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults; resolution never fails.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TASKFLOW_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TASKFLOW_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TASKFLOW_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "taskflow.sqlite3";

/// Resolved settings for one host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the task slot.
    pub db_path: PathBuf,
    /// Level string passed to [`crate::init_logging`].
    pub log_level: String,
    /// Log directory; `None` leaves logging off.
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
    /// Reads `TASKFLOW_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, so callers and tests can supply
    /// values without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: non_blank(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: non_blank(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
