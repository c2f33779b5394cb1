//! Task id allocation.
//!
//! # Responsibility
//! - Hand out time-derived task ids that never collide within a session.
//!
//! # Invariants
//! - An allocated id never equals any id seen before it.
//! - Below `i64::MAX`, each id is strictly greater than every id seen and
//!   follows the clock when it moves forward.

use crate::model::task::TaskId;
use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in Unix epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Settable clock for deterministic tests.
#[derive(Debug, Default)]
pub struct FixedClock {
    now_ms: Cell<i64>,
}

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// Allocator seeded from the ids already in a collection.
///
/// Ids grow above the largest id seen. Once that reaches `i64::MAX`, ids are
/// taken below the smallest id seen instead, so a taken value is never
/// returned.
#[derive(Debug, Clone, Default)]
pub struct TaskIdAllocator {
    /// `(lowest, highest)` id seen so far.
    range: Option<(i64, i64)>,
}

impl TaskIdAllocator {
    /// Starts above the largest id in `existing`.
    pub fn seeded_from(existing: impl IntoIterator<Item = TaskId>) -> Self {
        let range = existing.into_iter().fold(None, |range, id| {
            let value = id.get();
            Some(match range {
                Some((low, high)) => (value.min(low), value.max(high)),
                None => (value, value),
            })
        });
        Self { range }
    }

    /// Returns `max(now_ms, highest + 1)`, or `lowest - 1` once `highest`
    /// is `i64::MAX`.
    ///
    /// Returns `None` only when both ends of the id space are taken.
    pub fn next(&mut self, now_ms: i64) -> Option<TaskId> {
        let (value, range) = match self.range {
            None => (now_ms, (now_ms, now_ms)),
            Some((low, high)) => match high.checked_add(1) {
                Some(above) => {
                    let value = now_ms.max(above);
                    (value, (low, value))
                }
                None => {
                    let value = low.checked_sub(1)?;
                    (value, (value, high))
                }
            },
        };
        self.range = Some(range);
        Some(TaskId::new(value))
    }
}
