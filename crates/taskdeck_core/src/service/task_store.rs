//! Task collection store.
//!
//! # Responsibility
//! - Own the authoritative in-memory task list for one app session.
//! - Keep the derived filtered view consistent with list and criteria.
//! - Persist the full list to key-value storage after every mutation.
//!
//! # Invariants
//! - At most one task per id in `tasks`.
//! - `filtered_tasks == apply_filters(tasks, filter)` after every operation.
//! - In-memory state is updated before the write is issued; a failed write
//!   never rolls it back.
//! - Only `load` replaces the authoritative list wholesale.
//! - After a failed `load` the stored blob is left untouched and the read
//!   error stays surfaced until a later `load` succeeds or
//!   `overwrite_storage` is called.

use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskValidationError};
use crate::repo::kv_repo::{KeyValueStore, KvError};
use crate::search::filter::{apply_filters, task_counts, FilterPatch, TaskCounts, TaskFilter};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the JSON-encoded task array.
pub const TASKS_KEY: &str = "tasks";

pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task store error.
#[derive(Debug)]
pub enum TaskStoreError {
    /// Storage could not be read.
    StorageRead(KvError),
    /// Storage could not be written.
    StorageWrite(KvError),
    /// Persisted blob does not decode into a valid task list.
    MalformedData(String),
    /// No task with this id in the authoritative list.
    NotFound(TaskId),
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageRead(err) => write!(f, "failed to read tasks: {err}"),
            Self::StorageWrite(err) => write!(f, "failed to save tasks: {err}"),
            Self::MalformedData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageRead(err) | Self::StorageWrite(err) => Some(err),
            Self::MalformedData(_) | Self::NotFound(_) => None,
        }
    }
}

impl TaskStoreError {
    /// Whether this error came from reading persisted state.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::StorageRead(_) | Self::MalformedData(_))
    }
}

/// Read-only copy of store state handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStoreSnapshot {
    pub tasks: Vec<Task>,
    pub filtered_tasks: Vec<Task>,
    pub filter: TaskFilter,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Single owner of the session task list.
pub struct TaskStore<S: KeyValueStore> {
    kv: S,
    tasks: Vec<Task>,
    filtered_tasks: Vec<Task>,
    filter: TaskFilter,
    is_loading: bool,
    error: Option<String>,
    /// Message of the last failed `load`; blocks writes while set.
    read_failure: Option<String>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Creates an empty store persisting through `kv`. Call `load` to hydrate.
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            tasks: Vec::new(),
            filtered_tasks: Vec::new(),
            filter: TaskFilter::default(),
            is_loading: false,
            error: None,
            read_failure: None,
        }
    }

    /// Replaces the authoritative list with the persisted one.
    ///
    /// An absent key loads as an empty list. On failure the current list is
    /// kept, `error` is set, and later mutations stop writing to storage.
    pub fn load(&mut self) -> TaskStoreResult<usize> {
        self.is_loading = true;
        self.error = None;

        let result = self.read_persisted();
        self.is_loading = false;

        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                self.read_failure = None;
                self.refresh_view();
                info!(
                    "event=task_load module=store status=ok task_count={}",
                    self.tasks.len()
                );
                Ok(self.tasks.len())
            }
            Err(err) => {
                warn!("event=task_load module=store status=error error={err}");
                self.error = Some(err.to_string());
                self.read_failure = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Appends a newly created task and persists the list.
    ///
    /// Persistence failure is reported through `error` only.
    pub fn add(&mut self, input: NewTask) -> Task {
        let task = Task::create(input);
        self.tasks.push(task.clone());
        self.refresh_view();
        debug!(
            "event=task_add module=store status=ok task_count={}",
            self.tasks.len()
        );
        self.persist();
        task
    }

    /// Applies a partial update to one task and persists the list.
    ///
    /// Returns `NotFound` without touching `tasks` or `filtered_tasks` when
    /// `id` is unknown.
    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> TaskStoreResult<Task> {
        let Some(index) = self.position(id) else {
            let err = TaskStoreError::NotFound(id.to_string());
            warn!("event=task_update module=store status=error error_code=not_found");
            self.error = Some(err.to_string());
            return Err(err);
        };

        let updated = self.tasks[index].apply_update(patch);
        self.tasks[index] = updated.clone();
        self.refresh_view();
        debug!("event=task_update module=store status=ok");
        self.persist();
        Ok(updated)
    }

    /// Flips the completion flag of one task.
    pub fn toggle_complete(&mut self, id: &str) -> TaskStoreResult<Task> {
        let completed = match self.get(id) {
            Some(task) => task.completed,
            None => {
                let err = TaskStoreError::NotFound(id.to_string());
                self.error = Some(err.to_string());
                return Err(err);
            }
        };
        self.update(id, &TaskPatch::completed(!completed))
    }

    /// Deletes one task. Returns `false` (and writes nothing) when absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_remove module=store status=noop");
            return false;
        }

        self.refresh_view();
        debug!(
            "event=task_remove module=store status=ok task_count={}",
            self.tasks.len()
        );
        self.persist();
        true
    }

    /// Merges `patch` into the criteria and re-derives the view from `tasks`.
    pub fn set_filter(&mut self, patch: &FilterPatch) {
        self.filter.merge(patch);
        self.refresh_view();
    }

    /// Resets criteria to defaults; the view becomes the full list.
    pub fn clear_filters(&mut self) {
        self.filter = TaskFilter::default();
        self.filtered_tasks = self.tasks.clone();
    }

    /// Clears the last surfaced error message.
    ///
    /// Does not lift the write block left by a failed `load`.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Whether a failed `load` is currently blocking writes.
    pub fn has_unreadable_storage(&self) -> bool {
        self.read_failure.is_some()
    }

    /// Replaces the unreadable blob with the in-memory list.
    ///
    /// Lifts the write block and persists immediately. Returns whether the
    /// write succeeded.
    pub fn overwrite_storage(&mut self) -> bool {
        if self.read_failure.take().is_some() {
            info!(
                "event=task_overwrite module=store status=start task_count={}",
                self.tasks.len()
            );
        }
        self.persist();
        self.error.is_none()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filtered_tasks(&self) -> &[Task] {
        &self.filtered_tasks
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Completion counts over the authoritative list.
    pub fn counts(&self) -> TaskCounts {
        task_counts(&self.tasks)
    }

    pub fn snapshot(&self) -> TaskStoreSnapshot {
        TaskStoreSnapshot {
            tasks: self.tasks.clone(),
            filtered_tasks: self.filtered_tasks.clone(),
            filter: self.filter.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }

    /// Borrows the underlying storage.
    pub fn storage(&self) -> &S {
        &self.kv
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.kv
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn refresh_view(&mut self) {
        self.filtered_tasks = apply_filters(&self.tasks, &self.filter);
    }

    fn read_persisted(&self) -> TaskStoreResult<Vec<Task>> {
        let raw = self
            .kv
            .get(TASKS_KEY)
            .map_err(TaskStoreError::StorageRead)?;
        match raw {
            Some(raw) => decode_tasks(raw.as_str()),
            None => Ok(Vec::new()),
        }
    }

    // Best-effort write: the outcome only affects `error`.
    fn persist(&mut self) {
        if let Some(message) = self.read_failure.as_ref() {
            warn!("event=task_persist module=store status=skipped error_code=unreadable_storage");
            self.error = Some(message.clone());
            return;
        }

        let encoded = match serde_json::to_string(&self.tasks) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("event=task_persist module=store status=error error_code=encode_failed");
                self.error = Some(format!("failed to encode tasks: {err}"));
                return;
            }
        };

        match self.kv.set(TASKS_KEY, encoded.as_str()) {
            Ok(()) => {
                self.error = None;
            }
            Err(err) => {
                let err = TaskStoreError::StorageWrite(err);
                warn!("event=task_persist module=store status=error error={err}");
                self.error = Some(err.to_string());
            }
        }
    }
}

/// Decodes a persisted task array, rejecting invalid records and duplicate ids.
pub fn decode_tasks(raw: &str) -> TaskStoreResult<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(raw)
        .map_err(|err| TaskStoreError::MalformedData(err.to_string()))?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        task.validate()
            .map_err(|err: TaskValidationError| TaskStoreError::MalformedData(err.to_string()))?;
        if !seen.insert(task.id.as_str()) {
            return Err(TaskStoreError::MalformedData(format!(
                "duplicate task id `{}`",
                task.id
            )));
        }
    }

    Ok(tasks)
}
