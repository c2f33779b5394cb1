//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, views and persistence.
//! - Own the closed category set and its wire spelling.
//!
//! # Invariants
//! - `id` is unique inside one collection and never reassigned.
//! - `text` is non-empty after trimming.
//! - `category` is fixed at creation; only `completed` changes afterwards.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable integer identity for a task.
///
/// Serialized transparently as a JSON number so stored collections keep the
/// `{"id": 1700000000000, ...}` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of task categories, in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Personal,
    Trabajo,
    Compras,
    Otros,
}

impl Category {
    /// Every category in declared order.
    pub const ALL: [Category; 4] = [
        Category::Personal,
        Category::Trabajo,
        Category::Compras,
        Category::Otros,
    ];

    /// Wire/display label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Trabajo => "Trabajo",
            Self::Compras => "Compras",
            Self::Otros => "Otros",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category label did not match any known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError(pub String);

impl Display for CategoryParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown category `{}`; expected Personal|Trabajo|Compras|Otros",
            self.0
        )
    }
}

impl Error for CategoryParseError {}

impl FromStr for Category {
    type Err = CategoryParseError;

    /// Parses the exact label; matching is case-sensitive like the stored form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| CategoryParseError(value.to_string()))
    }
}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// `text` is empty or whitespace-only.
    BlankText(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText(id) => write!(f, "task {id} has blank text"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Field names double as the persisted JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub category: Category,
}

impl Task {
    /// Builds an open task from user input.
    ///
    /// Returns `None` when `text` is blank after trimming; otherwise stores the
    /// trimmed text.
    pub fn new(id: TaskId, text: &str, category: Category) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            id,
            text: trimmed.to_string(),
            completed: false,
            category,
        })
    }

    /// Checks record-level invariants.
    ///
    /// Used on decode paths where records did not pass through [`Task::new`].
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::BlankText(self.id));
        }
        Ok(())
    }

    /// Flips completion state in place.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
