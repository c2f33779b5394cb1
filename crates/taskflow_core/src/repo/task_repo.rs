//! Task collection persistence over a key-value slot.
//!
//! # Responsibility
//! - Save the full collection as a JSON array under [`TASKS_STORAGE_KEY`].
//! - Load it back, treating any malformed content as "no data".
//! - Report slot read failures separately so callers never overwrite data they
//!   could not read.
//!
//! # Invariants
//! - `load_tasks(save_tasks(c)) == c` for every valid collection.
//! - A loaded collection never contains blank text or repeated ids.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::RepoResult;
use log::{debug, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed slot key holding the serialized collection.
pub const TASKS_STORAGE_KEY: &str = "tasks";

/// Repository interface for the durable task collection.
pub trait TaskRepository {
    /// Reads the persisted collection.
    ///
    /// Returns `Ok(None)` when nothing is stored or the stored value is
    /// unusable. `Err` means the slot itself could not be read; the stored
    /// value may still be intact.
    fn load_tasks(&self) -> RepoResult<Option<Vec<Task>>>;
    /// Overwrites the persisted collection.
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
    /// Removes the persisted collection entirely.
    fn clear_tasks(&self) -> RepoResult<()>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for &R {
    fn load_tasks(&self) -> RepoResult<Option<Vec<Task>>> {
        (**self).load_tasks()
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        (**self).save_tasks(tasks)
    }

    fn clear_tasks(&self) -> RepoResult<()> {
        (**self).clear_tasks()
    }
}

/// Reasons a stored value is rejected on load.
#[derive(Debug)]
pub enum TaskDecodeError {
    /// Not JSON, not an array, or records with missing/mistyped fields.
    Json(serde_json::Error),
    Invalid(TaskValidationError),
    DuplicateId(TaskId),
}

impl Display for TaskDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed task json: {err}"),
            Self::Invalid(err) => write!(f, "invalid task record: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate task id {id}"),
        }
    }
}

impl Error for TaskDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

/// Serializes a collection to its stored JSON form.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

/// Parses and validates a stored JSON collection.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, TaskDecodeError> {
    let tasks: Vec<Task> = serde_json::from_str(raw).map_err(TaskDecodeError::Json)?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        task.validate().map_err(TaskDecodeError::Invalid)?;
        if !seen.insert(task.id) {
            return Err(TaskDecodeError::DuplicateId(task.id));
        }
    }

    Ok(tasks)
}

/// [`TaskRepository`] storing the collection in a [`KeyValueStore`] slot.
pub struct KeyValueTaskRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KeyValueTaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying slot storage.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> TaskRepository for KeyValueTaskRepository<S> {
    fn load_tasks(&self) -> RepoResult<Option<Vec<Task>>> {
        let raw = match self.store.get(TASKS_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=tasks_load module=repo status=absent");
                return Ok(None);
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=error error_code=slot_read_failed error={}",
                    err
                );
                return Err(err);
            }
        };

        match decode_tasks(&raw) {
            Ok(tasks) => {
                debug!(
                    "event=tasks_load module=repo status=ok count={}",
                    tasks.len()
                );
                Ok(Some(tasks))
            }
            Err(err) => {
                // Record text may appear in serde messages; log only the class.
                warn!(
                    "event=tasks_load module=repo status=error error_code={} bytes={}",
                    decode_error_code(&err),
                    raw.len()
                );
                Ok(None)
            }
        }
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        let raw = encode_tasks(tasks)?;
        self.store.set(TASKS_STORAGE_KEY, &raw)?;
        debug!(
            "event=tasks_save module=repo status=ok count={} bytes={}",
            tasks.len(),
            raw.len()
        );
        Ok(())
    }

    fn clear_tasks(&self) -> RepoResult<()> {
        self.store.remove(TASKS_STORAGE_KEY)
    }
}

fn decode_error_code(err: &TaskDecodeError) -> &'static str {
    match err {
        TaskDecodeError::Json(_) => "malformed_json",
        TaskDecodeError::Invalid(_) => "invalid_record",
        TaskDecodeError::DuplicateId(_) => "duplicate_id",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, encode_tasks, TaskDecodeError};
    use crate::model::task::{Category, Task, TaskId};

    #[test]
    fn encode_uses_flat_record_shape() {
        let task = Task::new(TaskId::new(1_700_000_000_000), "Buy milk", Category::Compras)
            .unwrap();
        let raw = encode_tasks(&[task]).unwrap();
        assert_eq!(
            raw,
            r#"[{"id":1700000000000,"text":"Buy milk","completed":false,"category":"Compras"}]"#
        );
    }

    #[test]
    fn decode_rejects_missing_fields_and_wrong_types() {
        assert!(matches!(
            decode_tasks(r#"[{"id":1,"text":"x","category":"Otros"}]"#),
            Err(TaskDecodeError::Json(_))
        ));
        assert!(matches!(
            decode_tasks(r#"[{"id":"1","text":"x","completed":false,"category":"Otros"}]"#),
            Err(TaskDecodeError::Json(_))
        ));
        assert!(matches!(
            decode_tasks(r#"{"id":1}"#),
            Err(TaskDecodeError::Json(_))
        ));
    }

    #[test]
    fn decode_rejects_unknown_category() {
        assert!(decode_tasks(r#"[{"id":1,"text":"x","completed":false,"category":"Work"}]"#)
            .is_err());
    }

    #[test]
    fn decode_rejects_duplicate_ids() {
        let raw = r#"[
            {"id":5,"text":"a","completed":false,"category":"Otros"},
            {"id":5,"text":"b","completed":true,"category":"Otros"}
        ]"#;
        assert!(matches!(
            decode_tasks(raw),
            Err(TaskDecodeError::DuplicateId(id)) if id == TaskId::new(5)
        ));
    }

    #[test]
    fn decode_accepts_empty_array() {
        assert!(decode_tasks("[]").unwrap().is_empty());
    }
}
