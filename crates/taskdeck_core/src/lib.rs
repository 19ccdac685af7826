//! Core domain logic for TaskDeck.
//! This crate is the single source of truth for task-list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::settings::{AppSettings, SettingsPatch, ThemeMode};
pub use model::task::{
    now_epoch_ms, DueDatePatch, NewTask, Task, TaskId, TaskPatch, TaskPriority,
    TaskValidationError,
};
pub use model::user::{User, UserPatch};
pub use repo::kv_repo::{KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore};
pub use search::filter::{
    apply_filters, task_counts, FilterPatch, PriorityFilter, StatusFilter, TaskCounts, TaskFilter,
};
pub use service::session_store::{SessionError, SessionStore};
pub use service::settings_store::SettingsStore;
pub use service::task_store::{TaskStore, TaskStoreError, TaskStoreResult, TaskStoreSnapshot};

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
