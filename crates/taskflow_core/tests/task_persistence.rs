use std::cell::Cell;
use taskflow_core::db::{open_db, open_db_in_memory, DbError};
use taskflow_core::{
    encode_tasks, Category, KeyValueStore, KeyValueTaskRepository, MemoryKeyValueStore,
    RepoError, RepoResult, SqliteKeyValueStore, StoreError, Task, TaskId, TaskRepository,
    TaskStore, TASKS_STORAGE_KEY,
};

/// Slot whose next `get` fails as if SQLite reported the database busy.
#[derive(Default)]
struct BusyOnceStore {
    inner: MemoryKeyValueStore,
    fail_next_get: Cell<bool>,
}

impl KeyValueStore for BusyOnceStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        if self.fail_next_get.replace(false) {
            let busy = rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(5), None);
            return Err(RepoError::Db(DbError::Sqlite(busy)));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.inner.remove(key)
    }
}

fn sample_tasks() -> Vec<Task> {
    vec![
        Task {
            id: TaskId::new(1_700_000_000_000),
            text: "Write report".to_string(),
            completed: true,
            category: Category::Trabajo,
        },
        Task {
            id: TaskId::new(1_700_000_000_001),
            text: "Comprar pan y leche".to_string(),
            completed: false,
            category: Category::Compras,
        },
        Task {
            id: TaskId::new(1_700_000_000_050),
            text: "Llamar a mamá \"hoy\"".to_string(),
            completed: false,
            category: Category::Personal,
        },
    ]
}

#[test]
fn save_then_load_returns_same_collection() {
    let conn = open_db_in_memory().unwrap();
    let repo = KeyValueTaskRepository::new(SqliteKeyValueStore::new(&conn));

    let tasks = sample_tasks();
    repo.save_tasks(&tasks).unwrap();
    assert_eq!(repo.load_tasks().unwrap().unwrap(), tasks);

    repo.save_tasks(&[]).unwrap();
    assert_eq!(repo.load_tasks().unwrap().unwrap(), Vec::<Task>::new());
}

#[test]
fn unset_slot_loads_as_absent() {
    let repo = KeyValueTaskRepository::new(MemoryKeyValueStore::new());
    assert!(repo.load_tasks().unwrap().is_none());
}

#[test]
fn malformed_slot_values_load_as_absent() {
    let store = MemoryKeyValueStore::new();
    let repo = KeyValueTaskRepository::new(&store);

    for raw in [
        "",
        "not json",
        "{}",
        "null",
        r#"[{"id":1,"text":"missing completed","category":"Otros"}]"#,
        r#"[{"id":1,"text":"bad type","completed":"no","category":"Otros"}]"#,
        r#"[{"id":1,"text":"   ","completed":false,"category":"Otros"}]"#,
        r#"[{"id":1,"text":"a","completed":false,"category":"Otros"},
            {"id":1,"text":"b","completed":false,"category":"Otros"}]"#,
    ] {
        store.set(TASKS_STORAGE_KEY, raw).unwrap();
        assert!(repo.load_tasks().unwrap().is_none(), "expected absent for {raw:?}");
    }
}

#[test]
fn store_opens_empty_over_corrupt_data_and_overwrites_it() {
    let store = MemoryKeyValueStore::new();
    store.set(TASKS_STORAGE_KEY, "[{\"id\":").unwrap();

    let mut task_store = TaskStore::open(KeyValueTaskRepository::new(&store));
    assert!(task_store.is_empty());

    let created = task_store
        .create("fresh start", Category::Otros)
        .unwrap()
        .unwrap();
    let reloaded = KeyValueTaskRepository::new(&store).load_tasks().unwrap().unwrap();
    assert_eq!(reloaded, vec![created]);
}

#[test]
fn clear_removes_the_slot() {
    let conn = open_db_in_memory().unwrap();
    let repo = KeyValueTaskRepository::new(SqliteKeyValueStore::new(&conn));
    repo.save_tasks(&sample_tasks()).unwrap();

    repo.clear_tasks().unwrap();
    assert!(repo.load_tasks().unwrap().is_none());
    assert_eq!(repo.store().get(TASKS_STORAGE_KEY).unwrap(), None);
}

#[test]
fn collection_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.sqlite3");

    let created_id = {
        let conn = open_db(&path).unwrap();
        let mut store = TaskStore::open(KeyValueTaskRepository::new(SqliteKeyValueStore::new(&conn)));
        let task = store.create("Pay rent", Category::Personal).unwrap().unwrap();
        store.toggle(task.id).unwrap();
        task.id
    };

    let conn = open_db(&path).unwrap();
    let store = TaskStore::open(KeyValueTaskRepository::new(SqliteKeyValueStore::new(&conn)));
    let task = store.get(created_id).expect("task should be persisted");
    assert_eq!(task.text, "Pay rent");
    assert!(task.completed);
}

#[test]
fn data_written_by_the_browser_app_loads_unchanged() {
    let store = MemoryKeyValueStore::new();
    store
        .set(
            TASKS_STORAGE_KEY,
            r#"[{"id":1718000000000,"text":"Lavar el coche","completed":false,"category":"Otros"}]"#,
        )
        .unwrap();

    let tasks = KeyValueTaskRepository::new(&store).load_tasks().unwrap().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::new(1_718_000_000_000));
    assert_eq!(tasks[0].category, Category::Otros);
}

#[test]
fn read_failure_at_open_leaves_saved_tasks_intact() {
    let kv = BusyOnceStore::default();
    let saved = sample_tasks()[..2].to_vec();
    kv.inner
        .set(TASKS_STORAGE_KEY, &encode_tasks(&saved).unwrap())
        .unwrap();
    kv.fail_next_get.set(true);

    let repo = KeyValueTaskRepository::new(&kv);
    let mut store = TaskStore::open(&repo);
    assert!(!store.is_loaded());
    assert!(matches!(
        store.create("new", Category::Otros),
        Err(StoreError::Unloaded)
    ));
    assert_eq!(repo.load_tasks().unwrap().unwrap(), saved);

    store.reload().unwrap();
    store.create("new", Category::Otros).unwrap().unwrap();
    let stored = repo.load_tasks().unwrap().unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(&stored[..2], saved.as_slice());
}

#[test]
fn read_failure_is_reported_by_the_repository() {
    let kv = BusyOnceStore::default();
    kv.fail_next_get.set(true);
    let repo = KeyValueTaskRepository::new(&kv);
    assert!(matches!(repo.load_tasks(), Err(RepoError::Db(_))));
    assert!(repo.load_tasks().unwrap().is_none());
}

#[test]
fn stored_max_id_does_not_get_reused() {
    let kv = MemoryKeyValueStore::new();
    let top = Task::new(TaskId::new(i64::MAX), "top", Category::Trabajo).unwrap();
    let repo = KeyValueTaskRepository::new(&kv);
    repo.save_tasks(&[top.clone()]).unwrap();

    let mut store = TaskStore::open(&repo);
    let created = store.create("next", Category::Trabajo).unwrap().unwrap();
    assert_ne!(created.id, top.id);

    let reloaded = repo.load_tasks().unwrap().unwrap();
    assert_eq!(reloaded, vec![top, created]);
}
