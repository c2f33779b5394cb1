//! Derived views over a task collection snapshot.
//!
//! # Responsibility
//! - Compute filtered subsets by status/category and search text.
//! - Compute aggregate counts and per-category shares.
//!
//! # Invariants
//! - Every function here is pure: input snapshots are never mutated.
//! - Output order follows source collection order.

pub mod filter;
pub mod stats;

pub use filter::{filter_tasks, FilterMode, FilterParseError};
pub use stats::{statistics, CategoryProgress, TaskStatistics};
