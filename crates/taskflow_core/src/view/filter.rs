//! Status/category filtering combined with case-insensitive text search.

use crate::model::task::{Category, Task};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which tasks a list view shows before search is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    All,
    /// Not completed.
    Active,
    Completed,
    Category(Category),
}

impl FilterMode {
    /// Whether `task` passes this mode, ignoring search text.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
            Self::Category(category) => task.category == category,
        }
    }

    /// Stable label accepted back by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Category(category) => category.as_str(),
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError(pub String);

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|active|completed or a category name",
            self.0
        )
    }
}

impl Error for FilterParseError {}

impl FromStr for FilterMode {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => other
                .parse::<Category>()
                .map(Self::Category)
                .map_err(|_| FilterParseError(other.to_string())),
        }
    }
}

/// Returns tasks matching `mode` whose text contains `query`, ignoring case.
///
/// An empty `query` matches every task. The query is used as typed (not
/// trimmed), so a trailing space narrows results.
pub fn filter_tasks<'a>(tasks: &'a [Task], mode: FilterMode, query: &str) -> Vec<&'a Task> {
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|task| mode.matches(task))
        .filter(|task| needle.is_empty() || task.text.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_tasks, FilterMode};
    use crate::model::task::{Category, Task, TaskId};

    fn task(id: i64, text: &str, completed: bool, category: Category) -> Task {
        Task {
            id: TaskId::new(id),
            text: text.to_string(),
            completed,
            category,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "Write report", true, Category::Trabajo),
            task(2, "Buy MILK", false, Category::Compras),
            task(3, "Call mom", false, Category::Personal),
            task(4, "Buy stamps", true, Category::Compras),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<i64> {
        tasks.iter().map(|task| task.id.get()).collect()
    }

    #[test]
    fn active_with_empty_query_keeps_open_tasks_in_order() {
        let tasks = sample();
        assert_eq!(ids(&filter_tasks(&tasks, FilterMode::Active, "")), vec![2, 3]);
    }

    #[test]
    fn search_is_case_insensitive_and_combines_with_mode() {
        let tasks = sample();
        assert_eq!(ids(&filter_tasks(&tasks, FilterMode::All, "buy")), vec![2, 4]);
        assert_eq!(ids(&filter_tasks(&tasks, FilterMode::All, "milk")), vec![2]);
        assert_eq!(
            ids(&filter_tasks(&tasks, FilterMode::Completed, "BUY")),
            vec![4]
        );
    }

    #[test]
    fn category_mode_selects_only_that_category() {
        let tasks = sample();
        assert_eq!(
            ids(&filter_tasks(&tasks, FilterMode::Category(Category::Compras), "")),
            vec![2, 4]
        );
        assert!(filter_tasks(&tasks, FilterMode::Category(Category::Otros), "").is_empty());
    }

    #[test]
    fn parse_round_trips_labels() {
        for label in ["all", "active", "completed", "Personal", "Otros"] {
            let mode: FilterMode = label.parse().unwrap();
            assert_eq!(mode.as_str(), label);
        }
        assert!("done".parse::<FilterMode>().is_err());
    }
}
