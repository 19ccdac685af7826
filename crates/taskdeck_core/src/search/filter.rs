//! In-memory task filter engine.
//!
//! # Responsibility
//! - Map `(tasks, criteria)` to the matching subset.
//! - Provide partial criteria merge used by list-screen controls.
//!
//! # Invariants
//! - Filtering is pure: no input is mutated and equal inputs give equal output.
//! - Output preserves input order; there is no re-sorting or truncation.
//! - Results are by-value copies of matching input tasks.

use crate::model::task::{Task, TaskPriority};

/// Completion-state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    /// Returns the stable wire label (`all|active|completed`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Parses a wire label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    fn accepts(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Priority filter; `All` disables the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(TaskPriority),
}

impl PriorityFilter {
    /// Returns `all` or the selected priority's wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(priority) => priority.as_str(),
        }
    }

    /// Parses `all` or a priority label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        TaskPriority::parse(value).map(Self::Only)
    }

    fn accepts(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => task.priority == priority,
        }
    }
}

/// Full filter criteria held by the task store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    /// Free text, matched case-insensitively against title or description.
    pub search_query: String,
}

/// Partial criteria update; `None` fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPatch {
    pub status: Option<StatusFilter>,
    pub priority: Option<PriorityFilter>,
    pub search_query: Option<String>,
}

impl TaskFilter {
    /// Returns whether all predicates are disabled.
    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }

    /// Overlays `patch` onto the current criteria.
    pub fn merge(&mut self, patch: &FilterPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(search_query) = patch.search_query.as_ref() {
            self.search_query = search_query.clone();
        }
    }
}

/// Completion counts over one task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Returns the tasks satisfying every active predicate, in input order.
pub fn apply_filters(tasks: &[Task], criteria: &TaskFilter) -> Vec<Task> {
    let needle = criteria.search_query.to_lowercase();
    tasks
        .iter()
        .filter(|task| criteria.status.accepts(task))
        .filter(|task| criteria.priority.accepts(task))
        .filter(|task| needle.is_empty() || task.matches_text(needle.as_str()))
        .cloned()
        .collect()
}

/// Counts active/completed tasks.
pub fn task_counts(tasks: &[Task]) -> TaskCounts {
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskCounts {
        total: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}
