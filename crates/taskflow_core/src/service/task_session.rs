//! Per-session facade joining the task store with list-view settings.
//!
//! # Responsibility
//! - Forward create/toggle/delete intents to [`TaskStore`].
//! - Hold the active filter mode and search query for list rendering.
//! - Recompute filtered tasks and statistics on demand.
//!
//! # Invariants
//! - View settings never change the stored collection.
//! - Derived views are recomputed from the current snapshot on every call.

use crate::model::task::{Category, Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::service::id_alloc::{Clock, SystemClock};
use crate::service::task_store::{StoreResult, TaskStore};
use crate::view::{filter_tasks, statistics, FilterMode, TaskStatistics};
use log::debug;

/// One application session: store plus filter/search state.
pub struct TaskSession<R: TaskRepository, C: Clock = SystemClock> {
    store: TaskStore<R, C>,
    filter: FilterMode,
    search_query: String,
}

impl<R: TaskRepository> TaskSession<R> {
    /// Loads persisted tasks and starts with `All` and an empty query.
    pub fn open(repo: R) -> Self {
        Self::new(TaskStore::open(repo))
    }
}

impl<R: TaskRepository, C: Clock> TaskSession<R, C> {
    pub fn new(store: TaskStore<R, C>) -> Self {
        Self {
            store,
            filter: FilterMode::All,
            search_query: String::new(),
        }
    }

    pub fn store(&self) -> &TaskStore<R, C> {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        debug!("event=view_filter module=session status=ok filter={filter}");
        self.filter = filter;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn create(&mut self, text: &str, category: Category) -> StoreResult<Option<Task>> {
        self.store.create(text, category)
    }

    pub fn toggle(&mut self, id: TaskId) -> StoreResult<Option<bool>> {
        self.store.toggle(id)
    }

    pub fn delete(&mut self, id: TaskId) -> StoreResult<bool> {
        self.store.delete(id)
    }

    /// Tasks visible under the current filter and search query.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        filter_tasks(self.store.tasks(), self.filter, &self.search_query)
    }

    pub fn statistics(&self) -> TaskStatistics {
        statistics(self.store.tasks())
    }
}

#[cfg(test)]
mod tests {
    use super::TaskSession;
    use crate::model::task::Category;
    use crate::repo::kv_repo::MemoryKeyValueStore;
    use crate::repo::task_repo::KeyValueTaskRepository;
    use crate::view::FilterMode;

    #[test]
    fn view_settings_shape_filtered_tasks_only() {
        let mut session = TaskSession::open(KeyValueTaskRepository::new(MemoryKeyValueStore::new()));
        session.create("Buy bread", Category::Compras).unwrap();
        session.create("Plan sprint", Category::Trabajo).unwrap();

        session.set_filter(FilterMode::Category(Category::Compras));
        let texts: Vec<&str> = session
            .filtered_tasks()
            .iter()
            .map(|task| task.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Buy bread"]);

        session.set_filter(FilterMode::All);
        session.set_search_query("SPRINT");
        assert_eq!(session.filtered_tasks().len(), 1);
        assert_eq!(session.tasks().len(), 2);
        assert_eq!(session.statistics().total, 2);
    }
}
