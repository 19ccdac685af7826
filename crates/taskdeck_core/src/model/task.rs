//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record rendered by list/detail screens.
//! - Own the construction and partial-update rules for tasks.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `id` and `created_at` never change after creation.
//! - `updated_at` is bumped on every mutation and never moves backwards.

use crate::model::timestamp;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable opaque identifier for one task.
///
/// Kept as a string alias: persisted ids from older installs are not UUIDs.
pub type TaskId = String;

/// User-facing priority bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Returns the stable wire label (`low|medium|high`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a wire label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Model validation errors for persisted or imported tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task id is empty or whitespace only.
    BlankId,
    /// `updated_at` is earlier than `created_at`.
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "task id must not be blank"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Serialized with camelCase keys and RFC 3339 timestamps, the shape the
/// device storage blob uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub priority: TaskPriority,
    /// Unix epoch milliseconds.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::rfc3339_opt"
    )]
    pub due_date: Option<i64>,
    /// Unix epoch milliseconds. Immutable after creation.
    #[serde(with = "timestamp::rfc3339")]
    pub created_at: i64,
    /// Unix epoch milliseconds. Bumped on every mutation.
    #[serde(with = "timestamp::rfc3339")]
    pub updated_at: i64,
    /// Owner reference, informational only.
    #[serde(default)]
    pub user_id: String,
}

/// Input for creating a task. Identity and timestamps are assigned by `Task::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: TaskPriority,
    pub due_date: Option<i64>,
    pub user_id: String,
}

impl NewTask {
    /// Active task with empty description and no due date.
    pub fn new(title: impl Into<String>, priority: TaskPriority) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            completed: false,
            priority,
            due_date: None,
            user_id: String::new(),
        }
    }
}

/// Update for the optional due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueDatePatch {
    #[default]
    Keep,
    Clear,
    Set(i64),
}

/// Partial task update.
///
/// Only mutable fields are representable here; `id` and `created_at` cannot be
/// overwritten through an update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    pub due_date: DueDatePatch,
    pub user_id: Option<String>,
}

impl TaskPatch {
    /// Patch that only sets the completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Returns whether this patch carries no field changes.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Task {
    /// Creates a task with a generated id, stamped with the current time.
    ///
    /// Title is not validated; that is a caller concern.
    pub fn create(input: NewTask) -> Self {
        Self::create_at(input, now_epoch_ms())
    }

    /// Creates a task stamped with `now` (epoch ms).
    pub fn create_at(input: NewTask, now: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            completed: input.completed,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
            user_id: input.user_id,
        }
    }

    /// Returns a copy with `patch` overlaid and `updated_at` bumped.
    pub fn apply_update(&self, patch: &TaskPatch) -> Self {
        self.apply_update_at(patch, now_epoch_ms())
    }

    /// Same as `apply_update` with an explicit clock reading.
    ///
    /// # Invariants
    /// - `id` and `created_at` are copied from `self`.
    /// - `updated_at = max(self.updated_at, now)`.
    pub fn apply_update_at(&self, patch: &TaskPatch, now: i64) -> Self {
        let mut next = self.clone();
        if let Some(title) = patch.title.as_ref() {
            next.title = title.clone();
        }
        if let Some(description) = patch.description.as_ref() {
            next.description = description.clone();
        }
        if let Some(completed) = patch.completed {
            next.completed = completed;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        match patch.due_date {
            DueDatePatch::Keep => {}
            DueDatePatch::Clear => next.due_date = None,
            DueDatePatch::Set(value) => next.due_date = Some(value),
        }
        if let Some(user_id) = patch.user_id.as_ref() {
            next.user_id = user_id.clone();
        }
        next.updated_at = now.max(self.updated_at);
        next
    }

    /// Checks invariants that decoded data must satisfy.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::BlankId);
        }
        if self.updated_at < self.created_at {
            return Err(TaskValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Case-insensitive substring match against title or description.
    ///
    /// `needle_lower` must already be lower-cased.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Falls back to `0` if the system clock reads before the Unix epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{DueDatePatch, NewTask, Task, TaskPatch, TaskPriority, TaskValidationError};

    #[test]
    fn create_assigns_identity_and_equal_timestamps() {
        let task = Task::create_at(NewTask::new("New", TaskPriority::Low), 1_000);
        assert!(!task.id.is_empty());
        assert_eq!(task.created_at, 1_000);
        assert_eq!(task.updated_at, task.created_at);
        assert!(!task.completed);
    }

    #[test]
    fn apply_update_keeps_identity_and_bumps_updated_at() {
        let task = Task::create_at(NewTask::new("draft", TaskPriority::Low), 1_000);
        let patch = TaskPatch {
            title: Some("final".to_string()),
            priority: Some(TaskPriority::High),
            due_date: DueDatePatch::Set(5_000),
            ..TaskPatch::default()
        };

        let updated = task.apply_update_at(&patch, 2_000);
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.created_at, 1_000);
        assert_eq!(updated.updated_at, 2_000);
        assert_eq!(updated.title, "final");
        assert_eq!(updated.priority, TaskPriority::High);
        assert_eq!(updated.due_date, Some(5_000));
        assert_eq!(updated.description, task.description);
    }

    #[test]
    fn apply_update_never_moves_updated_at_backwards() {
        let task = Task::create_at(NewTask::new("a", TaskPriority::Medium), 5_000);
        let updated = task.apply_update_at(&TaskPatch::completed(true), 4_000);
        assert_eq!(updated.updated_at, 5_000);
    }

    #[test]
    fn due_date_patch_can_clear() {
        let mut input = NewTask::new("dated", TaskPriority::Medium);
        input.due_date = Some(9_000);
        let task = Task::create_at(input, 1_000);

        let patch = TaskPatch {
            due_date: DueDatePatch::Clear,
            ..TaskPatch::default()
        };
        assert_eq!(task.apply_update_at(&patch, 2_000).due_date, None);
    }

    #[test]
    fn validate_rejects_blank_id_and_reversed_timestamps() {
        let mut task = Task::create_at(NewTask::new("x", TaskPriority::Low), 1_000);
        task.updated_at = 500;
        assert_eq!(
            task.validate(),
            Err(TaskValidationError::UpdatedBeforeCreated {
                created_at: 1_000,
                updated_at: 500,
            })
        );

        task.updated_at = 1_000;
        task.id = "  ".to_string();
        assert_eq!(task.validate(), Err(TaskValidationError::BlankId));
    }

    #[test]
    fn serializes_timestamps_as_rfc3339() {
        let mut input = NewTask::new("dated", TaskPriority::Low);
        input.due_date = Some(1_704_067_200_000);
        let task = Task::create_at(input, 1_704_103_200_000);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["createdAt"], "2024-01-01T10:00:00.000Z");
        assert_eq!(json["updatedAt"], "2024-01-01T10:00:00.000Z");
        assert_eq!(json["dueDate"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn deserializes_iso_strings_and_omitted_due_date() {
        let raw = r#"{"id":"1700000000000","title":"t","description":"","completed":false,
            "priority":"high","createdAt":"2024-01-01T10:00:00.000Z",
            "updatedAt":"2024-01-02T10:00:00.000Z","userId":"1"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.created_at, 1_704_103_200_000);
        assert_eq!(task.updated_at, 1_704_189_600_000);
        assert_eq!(task.due_date, None);

        let bad = raw.replace("2024-01-01T10:00:00.000Z", "yesterday");
        assert!(serde_json::from_str::<Task>(&bad).is_err());
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(TaskPriority::parse(" HIGH "), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("urgent"), None);
    }
}
