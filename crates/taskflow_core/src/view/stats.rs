//! Aggregate counts and per-category share of the collection.

use crate::model::task::{Category, Task};

/// Share of one category in the whole collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProgress {
    pub category: Category,
    /// Tasks in this category, completed or not.
    pub count: usize,
    /// `100 * count / total`, or `0.0` for an empty collection.
    pub percentage: f64,
}

impl CategoryProgress {
    /// Percentage with one decimal place, e.g. `"33.3"`.
    pub fn display_percentage(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatistics {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// One entry per category, in [`Category::ALL`] order.
    pub per_category: Vec<CategoryProgress>,
}

/// Computes counts and category shares for a snapshot.
pub fn statistics(tasks: &[Task]) -> TaskStatistics {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();

    let per_category = Category::ALL
        .into_iter()
        .map(|category| {
            let count = tasks
                .iter()
                .filter(|task| task.category == category)
                .count();
            CategoryProgress {
                category,
                count,
                percentage: share_of(count, total),
            }
        })
        .collect();

    TaskStatistics {
        total,
        completed,
        active: total - completed,
        per_category,
    }
}

fn share_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * count as f64 / total as f64
}
