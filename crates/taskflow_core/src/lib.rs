//! Core domain logic for TaskFlow.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{Category, CategoryParseError, Task, TaskId, TaskValidationError};
pub use repo::kv_repo::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use repo::task_repo::{
    decode_tasks, encode_tasks, KeyValueTaskRepository, TaskDecodeError, TaskRepository,
    TASKS_STORAGE_KEY,
};
pub use repo::{RepoError, RepoResult};
pub use service::id_alloc::{Clock, FixedClock, SystemClock, TaskIdAllocator};
pub use service::task_session::TaskSession;
pub use service::task_store::{StoreError, StoreResult, TaskStore};
pub use view::{
    filter_tasks, statistics, CategoryProgress, FilterMode, FilterParseError, TaskStatistics,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
