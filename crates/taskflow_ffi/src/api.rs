//! FFI use-case API for the Flutter task board.
//!
//! # Responsibility
//! - Expose task intents and derived views to Dart via FRB.
//! - Convert every core failure into a response envelope.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call loads the persisted collection, applies at most one intent and
//!   returns; calls are serialized through one process-wide lock.
//! - Filter mode and search query are owned by the UI and passed per call.

use log::warn;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock, PoisonError};
use taskflow_core::db::open_db;
use taskflow_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Category, CategoryProgress, CoreConfig, FilterMode, KeyValueTaskRepository,
    SqliteKeyValueStore, Task, TaskId, TaskSession, TaskStatistics,
};

type EntrySession<'conn> = TaskSession<KeyValueTaskRepository<SqliteKeyValueStore<'conn>>>;

static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static ENTRY_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One task as rendered by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    /// `Personal|Trabajo|Compras|Otros`.
    pub category: String,
}

/// List response envelope for full and filtered task lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    /// Tasks in insertion order (empty on failure).
    pub items: Vec<TaskItem>,
    pub message: String,
}

impl TaskListResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

/// Per-category progress bar data.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProgressItem {
    pub category: String,
    pub count: u32,
    pub percentage: f64,
    /// Percentage formatted with one decimal, e.g. `"33.3"`.
    pub label: String,
}

/// Statistics response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatisticsResponse {
    pub ok: bool,
    pub total: u32,
    pub completed: u32,
    pub active: u32,
    pub per_category: Vec<CategoryProgressItem>,
    pub message: String,
}

/// Generic action response envelope for create/toggle/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the call completed without a failure.
    pub ok: bool,
    /// Whether the stored collection changed.
    pub changed: bool,
    /// Affected task after the action, when there is one.
    pub task: Option<TaskItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TaskActionResponse {
    fn changed(message: impl Into<String>, task: Option<TaskItem>) -> Self {
        Self {
            ok: true,
            changed: true,
            task,
            message: message.into(),
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed: false,
            task: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            task: None,
            message: message.into(),
        }
    }
}

/// Category labels in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn task_categories() -> Vec<String> {
    Category::ALL
        .into_iter()
        .map(|category| category.as_str().to_string())
        .collect()
}

/// Lists every stored task.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list() -> TaskListResponse {
    match with_session(|session| session.tasks().iter().map(to_task_item).collect::<Vec<_>>()) {
        Ok(items) => list_success(items),
        Err(err) => TaskListResponse::failure(format!("tasks_list failed: {err}")),
    }
}

/// Lists tasks matching `filter` (`all|active|completed|<category>`) whose
/// text contains `query`, ignoring case.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown filter values return `ok=false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_filtered(filter: String, query: String) -> TaskListResponse {
    let mode = match FilterMode::from_str(filter.trim()) {
        Ok(mode) => mode,
        Err(err) => return TaskListResponse::failure(format!("tasks_filtered failed: {err}")),
    };

    let result = with_session(|session| {
        session.set_filter(mode);
        session.set_search_query(query);
        session
            .filtered_tasks()
            .into_iter()
            .map(to_task_item)
            .collect::<Vec<_>>()
    });
    match result {
        Ok(items) => list_success(items),
        Err(err) => TaskListResponse::failure(format!("tasks_filtered failed: {err}")),
    }
}

/// Returns totals and per-category share of the stored collection.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; percentages are `0` for an empty collection.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_statistics() -> TaskStatisticsResponse {
    match with_session(|session| session.statistics()) {
        Ok(stats) => to_statistics_response(&stats),
        Err(err) => TaskStatisticsResponse {
            ok: false,
            total: 0,
            completed: 0,
            active: 0,
            per_category: Vec::new(),
            message: format!("tasks_statistics failed: {err}"),
        },
    }
}

/// Creates a task from the add-task form.
///
/// # FFI contract
/// - Blank `text` is ignored: `ok=true`, `changed=false`.
/// - Unknown `category` returns `ok=false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(text: String, category: String) -> TaskActionResponse {
    let category = match Category::from_str(category.trim()) {
        Ok(category) => category,
        Err(err) => return TaskActionResponse::failure(format!("task_create failed: {err}")),
    };

    match with_session(|session| session.create(&text, category)) {
        Ok(Ok(Some(task))) => TaskActionResponse::changed("Task created.", Some(to_task_item(&task))),
        Ok(Ok(None)) => TaskActionResponse::unchanged("Empty task ignored."),
        Ok(Err(err)) => TaskActionResponse::failure(format!("task_create failed: {err}")),
        Err(err) => TaskActionResponse::failure(format!("task_create failed: {err}")),
    }
}

/// Flips completion of task `id`.
///
/// # FFI contract
/// - Unknown ids are ignored: `ok=true`, `changed=false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64) -> TaskActionResponse {
    let id = TaskId::new(id);
    let result = with_session(|session| {
        session
            .toggle(id)
            .map(|toggled| toggled.and_then(|_| session.store().get(id).map(to_task_item)))
    });
    match result {
        Ok(Ok(Some(task))) => TaskActionResponse::changed("Task updated.", Some(task)),
        Ok(Ok(None)) => TaskActionResponse::unchanged("Task not found."),
        Ok(Err(err)) => TaskActionResponse::failure(format!("task_toggle failed: {err}")),
        Err(err) => TaskActionResponse::failure(format!("task_toggle failed: {err}")),
    }
}

/// Deletes task `id`.
///
/// # FFI contract
/// - Unknown ids are ignored: `ok=true`, `changed=false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> TaskActionResponse {
    match with_session(|session| session.delete(TaskId::new(id))) {
        Ok(Ok(true)) => TaskActionResponse::changed("Task deleted.", None),
        Ok(Ok(false)) => TaskActionResponse::unchanged("Task not found."),
        Ok(Err(err)) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| CoreConfig::from_env().db_path)
        .clone()
}

fn with_session<T>(f: impl FnOnce(&mut EntrySession<'_>) -> T) -> Result<T, String> {
    let _guard = ENTRY_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let db_path = resolve_entry_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=entry_open module=ffi status=error error={err}");
        format!("task DB open failed: {err}")
    })?;
    let mut session = TaskSession::open(KeyValueTaskRepository::new(SqliteKeyValueStore::new(
        &conn,
    )));
    if !session.store().is_loaded() {
        warn!("event=entry_open module=ffi status=error error_code=load_failed");
        return Err("task DB read failed; stored tasks were left untouched".to_string());
    }
    Ok(f(&mut session))
}

fn list_success(items: Vec<TaskItem>) -> TaskListResponse {
    let message = if items.is_empty() {
        "No tasks.".to_string()
    } else {
        format!("Found {} task(s).", items.len())
    };
    TaskListResponse {
        ok: true,
        items,
        message,
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.get(),
        text: task.text.clone(),
        completed: task.completed,
        category: task.category.as_str().to_string(),
    }
}

fn to_progress_item(progress: &CategoryProgress) -> CategoryProgressItem {
    CategoryProgressItem {
        category: progress.category.as_str().to_string(),
        count: count_to_u32(progress.count),
        percentage: progress.percentage,
        label: progress.display_percentage(),
    }
}

fn to_statistics_response(stats: &TaskStatistics) -> TaskStatisticsResponse {
    TaskStatisticsResponse {
        ok: true,
        total: count_to_u32(stats.total),
        completed: count_to_u32(stats.completed),
        active: count_to_u32(stats.active),
        per_category: stats.per_category.iter().map(to_progress_item).collect(),
        message: format!("{} task(s).", stats.total),
    }
}

fn count_to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
