//! Task domain model.
//!
//! # Responsibility
//! - Define the data structures used by store, views and persistence.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion removes the record; there are no tombstones.

pub mod task;
