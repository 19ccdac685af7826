#![allow(dead_code)]

use taskdeck_core::{KeyValueStore, KvError, KvResult, MemoryKvStore, NewTask, TaskPriority};

/// Memory-backed store whose reads and writes can be switched off.
#[derive(Default)]
pub struct FlakyKvStore {
    pub inner: MemoryKvStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: usize,
}

impl FlakyKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for FlakyKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        if self.fail_reads {
            return Err(KvError::Unavailable("reads disabled".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        if self.fail_writes {
            return Err(KvError::Unavailable("writes disabled".to_string()));
        }
        self.writes += 1;
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        if self.fail_writes {
            return Err(KvError::Unavailable("writes disabled".to_string()));
        }
        self.inner.remove(key)
    }
}

pub fn new_task(title: &str, priority: TaskPriority, completed: bool) -> NewTask {
    let mut input = NewTask::new(title, priority);
    input.completed = completed;
    input.user_id = "1".to_string();
    input
}

/// `2024-01-01T10:00:00.000Z` in epoch milliseconds.
pub const FIXTURE_CREATED_AT: i64 = 1_704_103_200_000;

/// Persisted blob with the two-task fixture used across scenarios.
pub const TWO_TASKS_JSON: &str = r#"[
    {"id":"1","title":"Buy milk","description":"","completed":false,"priority":"high","createdAt":"2024-01-01T10:00:00.000Z","updatedAt":"2024-01-01T10:00:00.000Z","userId":"1"},
    {"id":"2","title":"Clean house","description":"","completed":true,"priority":"medium","createdAt":"2024-01-01T10:00:00.000Z","updatedAt":"2024-01-01T10:00:00.000Z","userId":"1"}
]"#;

/// Blob as written by the JavaScript app: millisecond-string ids, ISO
/// timestamps, and a due date on one record only.
pub const JS_APP_TASKS_JSON: &str = r#"[{"id":"1704103200000","title":"Pay rent","description":"Before the 5th","completed":false,"dueDate":"2024-01-05T00:00:00.000Z","priority":"high","createdAt":"2024-01-01T10:00:00.000Z","updatedAt":"2024-01-01T10:00:00.000Z","userId":"1"},{"id":"1704189600000","title":"Call mom","description":"","completed":true,"priority":"low","createdAt":"2024-01-02T10:00:00.000Z","updatedAt":"2024-01-03T08:30:15.250Z","userId":"1"}]"#;
