//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskflow_core` linkage without the Flutter runtime.
//! - Print a one-shot summary of the configured task store.

use taskflow_core::db::open_db;
use taskflow_core::{
    init_logging, CoreConfig, KeyValueTaskRepository, SqliteKeyValueStore, TaskSession,
};

fn main() {
    println!("taskflow_core ping={}", taskflow_core::ping());
    println!("taskflow_core version={}", taskflow_core::core_version());

    let config = CoreConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_deref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("taskflow logging disabled: {err}");
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!(
                "taskflow db_path={} open failed: {err}",
                config.db_path.display()
            );
            std::process::exit(1);
        }
    };

    let session = TaskSession::open(KeyValueTaskRepository::new(SqliteKeyValueStore::new(&conn)));
    let stats = session.statistics();
    println!("taskflow db_path={}", config.db_path.display());
    println!(
        "taskflow total={} completed={} active={}",
        stats.total, stats.completed, stats.active
    );
    for progress in &stats.per_category {
        println!(
            "taskflow category={} count={} share={}%",
            progress.category,
            progress.count,
            progress.display_percentage()
        );
    }
}
