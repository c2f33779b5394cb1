//! Authoritative in-memory task collection with write-through persistence.
//!
//! # Responsibility
//! - Own the session's task collection and its id allocator.
//! - Apply create/toggle/delete intents and persist after each one.
//!
//! # Invariants
//! - In-memory and persisted collections are equal after every mutation call
//!   returns, whether it succeeded or failed.
//! - Collection order is insertion order; toggles never reorder.
//! - Blank text and unknown ids are silent no-ops, not errors.
//! - A store whose slot could not be read never writes to it, so data that
//!   failed to load is not overwritten by an empty collection.

use crate::model::task::{Category, Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::service::id_alloc::{Clock, SystemClock, TaskIdAllocator};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Task store failure.
#[derive(Debug)]
pub enum StoreError {
    /// The next snapshot could not be saved; memory kept the previous one.
    Persist(RepoError),
    /// The slot could not be read at open; mutations stay disabled until
    /// [`TaskStore::reload`] succeeds.
    Unloaded,
    /// Every task id value is taken.
    IdsExhausted,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persist(err) => write!(f, "failed to persist tasks: {err}"),
            Self::Unloaded => write!(f, "stored tasks could not be read; refusing to modify them"),
            Self::IdsExhausted => write!(f, "no unused task id is left"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist(err) => Some(err),
            Self::Unloaded | Self::IdsExhausted => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persist(value)
    }
}

/// Session-scoped task store.
pub struct TaskStore<R: TaskRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    ids: TaskIdAllocator,
    tasks: Vec<Task>,
    loaded: bool,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Loads the persisted collection using the wall clock for new ids.
    pub fn open(repo: R) -> Self {
        Self::open_with_clock(repo, SystemClock)
    }
}

impl<R: TaskRepository, C: Clock> TaskStore<R, C> {
    /// Loads the persisted collection.
    ///
    /// Absent or unusable stored data starts an empty collection. A slot read
    /// failure also starts empty but leaves the store unloaded; this never
    /// fails.
    pub fn open_with_clock(repo: R, clock: C) -> Self {
        let mut store = Self {
            repo,
            clock,
            ids: TaskIdAllocator::default(),
            tasks: Vec::new(),
            loaded: false,
        };
        // Failure is recorded in `loaded` and logged inside `reload`.
        let _ = store.reload();
        store
    }

    /// Re-reads the persisted collection, replacing the in-memory one.
    ///
    /// # Errors
    /// - `StoreError::Unloaded` when the slot cannot be read; the store then
    ///   keeps an empty snapshot and rejects mutations.
    pub fn reload(&mut self) -> StoreResult<()> {
        match self.repo.load_tasks() {
            Ok(tasks) => {
                self.tasks = tasks.unwrap_or_default();
                self.ids = TaskIdAllocator::seeded_from(self.tasks.iter().map(|task| task.id));
                self.loaded = true;
                info!(
                    "event=store_open module=store status=ok count={}",
                    self.tasks.len()
                );
                Ok(())
            }
            Err(err) => {
                self.tasks.clear();
                self.ids = TaskIdAllocator::default();
                self.loaded = false;
                error!(
                    "event=store_open module=store status=error error_code=load_failed error={}",
                    err
                );
                Err(StoreError::Unloaded)
            }
        }
    }

    /// Whether the persisted collection was read successfully.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Current snapshot, oldest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Appends a new open task with trimmed `text`.
    ///
    /// Returns `Ok(None)` without touching storage when `text` is blank.
    pub fn create(&mut self, text: &str, category: Category) -> StoreResult<Option<Task>> {
        self.ensure_loaded()?;
        let id = self
            .ids
            .next(self.clock.now_ms())
            .ok_or(StoreError::IdsExhausted)?;
        let Some(task) = Task::new(id, text, category) else {
            debug!("event=task_create module=store status=skipped reason=blank_text");
            return Ok(None);
        };

        let mut next = Vec::with_capacity(self.tasks.len() + 1);
        next.extend_from_slice(&self.tasks);
        next.push(task.clone());
        self.commit(next, "task_create", id)?;
        Ok(Some(task))
    }

    /// Flips completion of the task with `id`.
    ///
    /// Returns the new completion state, or `Ok(None)` when `id` is unknown.
    pub fn toggle(&mut self, id: TaskId) -> StoreResult<Option<bool>> {
        self.ensure_loaded()?;
        let Some(index) = self.position(id) else {
            debug!("event=task_toggle module=store status=skipped reason=not_found task_id={id}");
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        next[index].toggle();
        let completed = next[index].completed;
        self.commit(next, "task_toggle", id)?;
        Ok(Some(completed))
    }

    /// Removes the task with `id`.
    ///
    /// Returns whether a task was removed; a second delete is a no-op.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<bool> {
        self.ensure_loaded()?;
        let Some(index) = self.position(id) else {
            debug!("event=task_delete module=store status=skipped reason=not_found task_id={id}");
            return Ok(false);
        };

        let mut next = self.tasks.clone();
        next.remove(index);
        self.commit(next, "task_delete", id)?;
        Ok(true)
    }

    fn ensure_loaded(&self) -> StoreResult<()> {
        if self.loaded {
            Ok(())
        } else {
            Err(StoreError::Unloaded)
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn commit(&mut self, next: Vec<Task>, event: &str, id: TaskId) -> StoreResult<()> {
        if let Err(err) = self.repo.save_tasks(&next) {
            error!(
                "event={} module=store status=error error_code=persist_failed task_id={} error={}",
                event, id, err
            );
            return Err(err.into());
        }

        self.tasks = next;
        info!(
            "event={} module=store status=ok task_id={} count={}",
            event,
            id,
            self.tasks.len()
        );
        Ok(())
    }
}
