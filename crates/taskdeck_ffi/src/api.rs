//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task, settings and mocked sign-in operations to Dart via FRB.
//! - Flatten core types into plain envelopes with stable string labels.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One `TaskSession` owns one set of stores; callers hold and pass it in.
//! - Store state is only touched under the session mutex.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use taskdeck_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppSettings, CoreConfig, DueDatePatch, FilterPatch, NewTask, PriorityFilter, SessionError,
    SessionStore, SettingsPatch, SettingsStore, SqliteKvStore, StatusFilter, Task, TaskPatch,
    TaskPriority, TaskStore, ThemeMode, User, UserPatch,
};

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

struct SessionState {
    tasks: TaskStore<SqliteKvStore>,
    settings: SettingsStore<SqliteKvStore>,
    auth: SessionStore<SqliteKvStore>,
}

/// Opaque handle owning the stores of one app session.
#[flutter_rust_bridge::frb(opaque)]
pub struct TaskSession {
    state: Mutex<SessionState>,
}

impl TaskSession {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // FFI calls must not panic; recover the guard from a poisoned lock.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Opens a session on the SQLite file at `db_path`.
///
/// `None` or blank falls back to `TASKDECK_DB_PATH`, then the temp dir.
/// Stores start empty; call `tasks_load`, `settings_load` and
/// `session_check` next.
///
/// # FFI contract
/// - Sync call, opens the DB file and upgrades its schema.
/// - Returns an error message instead of panicking.
#[flutter_rust_bridge::frb(sync)]
pub fn open_session(db_path: Option<String>) -> Result<TaskSession, String> {
    let path = resolve_db_path(db_path);
    let tasks_kv =
        SqliteKvStore::open(&path).map_err(|err| format!("open_session failed: {err}"))?;
    let settings_kv =
        SqliteKvStore::open(&path).map_err(|err| format!("open_session failed: {err}"))?;
    let auth_kv =
        SqliteKvStore::open(&path).map_err(|err| format!("open_session failed: {err}"))?;
    Ok(TaskSession {
        state: Mutex::new(SessionState {
            tasks: TaskStore::new(tasks_kv),
            settings: SettingsStore::new(settings_kv),
            auth: SessionStore::new(auth_kv),
        }),
    })
}

/// Flat task row for list/detail rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// `low|medium|high`.
    pub priority: String,
    pub due_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub user_id: String,
}

/// Derived list view plus store status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksViewResponse {
    pub ok: bool,
    pub message: String,
    /// Filtered rows in authoritative-list order.
    pub items: Vec<TaskItem>,
    pub total: u32,
    pub active: u32,
    pub completed: u32,
    /// `all|active|completed`.
    pub filter_status: String,
    /// `all|low|medium|high`.
    pub filter_priority: String,
    pub search_query: String,
    pub is_loading: bool,
    /// Last surfaced store error, cleared by `tasks_dismiss_error`.
    pub error: Option<String>,
    /// Stored tasks could not be read; edits stay in memory until
    /// `tasks_overwrite_storage` or a successful `tasks_load`.
    pub unreadable_storage: bool,
}

/// Result of one task mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    pub task: Option<TaskItem>,
    pub message: String,
    /// Non-fatal persistence error recorded by the store, if any.
    pub error: Option<String>,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task: Option<TaskItem>, error: Option<String>) -> Self {
        Self {
            ok: true,
            task,
            message: message.into(),
            error,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task: None,
            message: message.into(),
            error: None,
        }
    }
}

/// Signed-in profile row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserItem {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_image: Option<String>,
}

/// Mocked sign-in state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub ok: bool,
    pub signed_in: bool,
    pub user: Option<UserItem>,
    pub message: String,
}

/// Settings envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsResponse {
    pub ok: bool,
    /// `light|dark|system`.
    pub theme: String,
    pub notifications: bool,
    pub language: String,
    pub error: Option<String>,
}

/// Reloads tasks from storage and returns the refreshed view.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_load(session: &TaskSession) -> TasksViewResponse {
    let mut state = session.lock();
    match state.tasks.load() {
        Ok(count) => view_response(&state.tasks, true, format!("Loaded {count} task(s).")),
        Err(err) => view_response(&state.tasks, false, format!("tasks_load failed: {err}")),
    }
}

/// Returns the current view without touching storage.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_snapshot(session: &TaskSession) -> TasksViewResponse {
    let state = session.lock();
    view_response(&state.tasks, true, String::new())
}

/// Adds one task.
///
/// Title is trimmed but not validated here; the form validates it.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_add(
    session: &TaskSession,
    title: String,
    description: String,
    priority: String,
    due_date: Option<i64>,
    user_id: String,
) -> TaskActionResponse {
    let Some(priority) = TaskPriority::parse(priority.as_str()) else {
        return TaskActionResponse::failure(format!(
            "tasks_add failed: unknown priority `{priority}`"
        ));
    };

    let mut input = NewTask::new(title.trim(), priority);
    input.description = description;
    input.due_date = due_date;
    input.user_id = user_id;

    let mut state = session.lock();
    let task = state.tasks.add(input);
    let error = state.tasks.error().map(str::to_string);
    TaskActionResponse::success("Task created.", Some(to_task_item(&task)), error)
}

/// Applies a partial update. `None` fields are left unchanged.
///
/// `clear_due_date = true` removes the due date and wins over `due_date`.
#[flutter_rust_bridge::frb(sync)]
#[allow(clippy::too_many_arguments)]
pub fn tasks_update(
    session: &TaskSession,
    id: String,
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    completed: Option<bool>,
    due_date: Option<i64>,
    clear_due_date: bool,
) -> TaskActionResponse {
    let priority = match priority.as_deref().map(TaskPriority::parse) {
        Some(None) => {
            return TaskActionResponse::failure(format!(
                "tasks_update failed: unknown priority `{}`",
                priority.unwrap_or_default()
            ));
        }
        Some(parsed) => parsed,
        None => None,
    };

    let patch = TaskPatch {
        title: title.map(|value| value.trim().to_string()),
        description,
        completed,
        priority,
        due_date: match (clear_due_date, due_date) {
            (true, _) => DueDatePatch::Clear,
            (false, Some(value)) => DueDatePatch::Set(value),
            (false, None) => DueDatePatch::Keep,
        },
        user_id: None,
    };

    let mut state = session.lock();
    match state.tasks.update(id.as_str(), &patch) {
        Ok(task) => {
            let error = state.tasks.error().map(str::to_string);
            TaskActionResponse::success("Task updated.", Some(to_task_item(&task)), error)
        }
        Err(err) => TaskActionResponse::failure(format!("tasks_update failed: {err}")),
    }
}

/// Flips completion for one task.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_toggle(session: &TaskSession, id: String) -> TaskActionResponse {
    let mut state = session.lock();
    match state.tasks.toggle_complete(id.as_str()) {
        Ok(task) => {
            let error = state.tasks.error().map(str::to_string);
            TaskActionResponse::success("Task updated.", Some(to_task_item(&task)), error)
        }
        Err(err) => TaskActionResponse::failure(format!("tasks_toggle failed: {err}")),
    }
}

/// Deletes one task. Unknown ids succeed with a "nothing to delete" message.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_delete(session: &TaskSession, id: String) -> TaskActionResponse {
    let mut state = session.lock();
    let message = if state.tasks.remove(id.as_str()) {
        "Task deleted."
    } else {
        "Nothing to delete."
    };
    let error = state.tasks.error().map(str::to_string);
    TaskActionResponse::success(message, None, error)
}

/// Merges filter criteria. `None` fields keep their current value.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_set_filter(
    session: &TaskSession,
    status: Option<String>,
    priority: Option<String>,
    search_query: Option<String>,
) -> TasksViewResponse {
    let mut state = session.lock();

    let status = match status.as_deref().map(StatusFilter::parse) {
        Some(None) => {
            return view_response(
                &state.tasks,
                false,
                "tasks_set_filter failed: unknown status".to_string(),
            );
        }
        Some(parsed) => parsed,
        None => None,
    };
    let priority = match priority.as_deref().map(PriorityFilter::parse) {
        Some(None) => {
            return view_response(
                &state.tasks,
                false,
                "tasks_set_filter failed: unknown priority".to_string(),
            );
        }
        Some(parsed) => parsed,
        None => None,
    };

    state.tasks.set_filter(&FilterPatch {
        status,
        priority,
        search_query,
    });
    view_response(&state.tasks, true, String::new())
}

/// Resets filter criteria.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_clear_filters(session: &TaskSession) -> TasksViewResponse {
    let mut state = session.lock();
    state.tasks.clear_filters();
    view_response(&state.tasks, true, String::new())
}

/// Clears the surfaced store error.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_dismiss_error(session: &TaskSession) -> TasksViewResponse {
    let mut state = session.lock();
    state.tasks.dismiss_error();
    view_response(&state.tasks, true, String::new())
}

/// Replaces unreadable stored tasks with the current in-memory list.
///
/// Only meaningful after a failed `tasks_load`; otherwise it just saves.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_overwrite_storage(session: &TaskSession) -> TasksViewResponse {
    let mut state = session.lock();
    if state.tasks.overwrite_storage() {
        view_response(&state.tasks, true, "Stored tasks replaced.".to_string())
    } else {
        view_response(
            &state.tasks,
            false,
            "tasks_overwrite_storage failed".to_string(),
        )
    }
}

/// Signs in with any non-blank email and password.
#[flutter_rust_bridge::frb(sync)]
pub fn session_login(session: &TaskSession, email: String, password: String) -> AuthResponse {
    let mut state = session.lock();
    let result = state
        .auth
        .login(email.as_str(), password.as_str())
        .map(to_user_item);
    auth_response(&state.auth, result, "session_login")
}

/// Registers and signs in with any non-blank fields.
#[flutter_rust_bridge::frb(sync)]
pub fn session_register(
    session: &TaskSession,
    username: String,
    email: String,
    password: String,
) -> AuthResponse {
    let mut state = session.lock();
    let result = state
        .auth
        .register(username.as_str(), email.as_str(), password.as_str())
        .map(to_user_item);
    auth_response(&state.auth, result, "session_register")
}

/// Restores the sign-in from the stored token.
///
/// `ok = false` with `signed_in = false` when no token is stored.
#[flutter_rust_bridge::frb(sync)]
pub fn session_check(session: &TaskSession) -> AuthResponse {
    let mut state = session.lock();
    let result = state.auth.check().map(to_user_item);
    auth_response(&state.auth, result, "session_check")
}

/// Signs out. Always succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn session_logout(session: &TaskSession) -> AuthResponse {
    let mut state = session.lock();
    state.auth.logout();
    AuthResponse {
        ok: true,
        signed_in: false,
        user: None,
        message: "Signed out.".to_string(),
    }
}

/// Edits the signed-in profile. `None` fields are left unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn session_update_user(
    session: &TaskSession,
    username: Option<String>,
    email: Option<String>,
    profile_image: Option<String>,
) -> AuthResponse {
    let mut state = session.lock();
    let patch = UserPatch {
        username,
        email,
        profile_image,
    };
    match state.auth.update_user(&patch).map(to_user_item) {
        Some(user) => AuthResponse {
            ok: true,
            signed_in: true,
            user: Some(user),
            message: "Profile updated.".to_string(),
        },
        None => AuthResponse {
            ok: false,
            signed_in: false,
            user: None,
            message: "session_update_user failed: not signed in".to_string(),
        },
    }
}

/// Loads persisted settings (defaults on first launch).
#[flutter_rust_bridge::frb(sync)]
pub fn settings_load(session: &TaskSession) -> SettingsResponse {
    let mut state = session.lock();
    let ok = state.settings.load();
    settings_response(ok, state.settings.settings(), state.settings.error())
}

/// Merges and persists settings. Unknown theme labels are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_update(
    session: &TaskSession,
    theme: Option<String>,
    notifications: Option<bool>,
    language: Option<String>,
) -> SettingsResponse {
    let mut state = session.lock();
    let theme = match theme.as_deref().map(ThemeMode::parse) {
        Some(None) => {
            return settings_response(
                false,
                state.settings.settings(),
                Some("settings_update failed: unknown theme"),
            );
        }
        Some(parsed) => parsed,
        None => None,
    };

    state.settings.update(&SettingsPatch {
        theme,
        notifications,
        language,
    });
    let ok = state.settings.error().is_none();
    if !ok {
        warn!("event=ffi_settings_update module=ffi status=error");
    }
    settings_response(ok, state.settings.settings(), state.settings.error())
}

fn resolve_db_path(db_path: Option<String>) -> PathBuf {
    db_path
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| CoreConfig::from_env().db_path)
}

fn view_response(
    store: &TaskStore<SqliteKvStore>,
    ok: bool,
    message: String,
) -> TasksViewResponse {
    let counts = store.counts();
    let filter = store.filter();
    TasksViewResponse {
        ok,
        message,
        items: store.filtered_tasks().iter().map(to_task_item).collect(),
        total: saturating_u32(counts.total),
        active: saturating_u32(counts.active),
        completed: saturating_u32(counts.completed),
        filter_status: filter.status.as_str().to_string(),
        filter_priority: filter.priority.as_str().to_string(),
        search_query: filter.search_query.clone(),
        is_loading: store.is_loading(),
        error: store.error().map(str::to_string),
        unreadable_storage: store.has_unreadable_storage(),
    }
}

fn auth_response(
    store: &SessionStore<SqliteKvStore>,
    result: Result<UserItem, SessionError>,
    call: &str,
) -> AuthResponse {
    match result {
        Ok(user) => AuthResponse {
            ok: true,
            signed_in: store.is_signed_in(),
            user: Some(user),
            message: String::new(),
        },
        Err(err) => AuthResponse {
            ok: false,
            signed_in: store.is_signed_in(),
            user: store.user().map(to_user_item),
            message: format!("{call} failed: {err}"),
        },
    }
}

fn to_user_item(user: &User) -> UserItem {
    UserItem {
        id: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        profile_image: user.profile_image.clone(),
    }
}

fn settings_response(ok: bool, settings: &AppSettings, error: Option<&str>) -> SettingsResponse {
    SettingsResponse {
        ok,
        theme: settings.theme.as_str().to_string(),
        notifications: settings.notifications,
        language: settings.language.clone(),
        error: error.map(str::to_string),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        completed: task.completed,
        priority: task.priority.as_str().to_string(),
        due_date: task.due_date,
        created_at: task.created_at,
        updated_at: task.updated_at,
        user_id: task.user_id.clone(),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, open_session, ping, session_check, session_login,
        session_logout, session_register, session_update_user, settings_load, settings_update,
        tasks_add, tasks_clear_filters, tasks_delete, tasks_load, tasks_overwrite_storage,
        tasks_set_filter, tasks_snapshot, tasks_toggle, tasks_update, TaskSession,
    };
    use taskdeck_core::{KeyValueStore, SqliteKvStore};

    fn session_in(dir: &tempfile::TempDir) -> TaskSession {
        let path = dir.path().join("session.sqlite3");
        open_session(Some(path.to_string_lossy().into_owned())).expect("open session")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn add_filter_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);
        assert!(tasks_load(&session).ok);

        let milk = tasks_add(
            &session,
            "  Buy milk ".to_string(),
            String::new(),
            "high".to_string(),
            None,
            "1".to_string(),
        );
        assert!(milk.ok, "{}", milk.message);
        let milk = milk.task.expect("created task");
        assert_eq!(milk.title, "Buy milk");

        let house = tasks_add(
            &session,
            "Clean house".to_string(),
            "kitchen".to_string(),
            "medium".to_string(),
            Some(1_700_000_000_000),
            "1".to_string(),
        )
        .task
        .expect("created task");
        assert!(tasks_toggle(&session, house.id.clone()).ok);

        let view = tasks_set_filter(&session, Some("completed".to_string()), None, None);
        assert!(view.ok);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, house.id);
        assert_eq!(view.total, 2);
        assert_eq!(view.completed, 1);

        let view = tasks_clear_filters(&session);
        assert_eq!(view.filter_status, "all");
        assert_eq!(view.items.len(), 2);

        let reopened = session_in(&dir);
        let view = tasks_load(&reopened);
        assert!(view.ok, "{}", view.message);
        assert_eq!(view.items.len(), 2);
        assert!(view.items.iter().any(|item| item.id == milk.id));
    }

    #[test]
    fn invalid_labels_are_rejected_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        let added = tasks_add(
            &session,
            "x".to_string(),
            String::new(),
            "urgent".to_string(),
            None,
            String::new(),
        );
        assert!(!added.ok);
        assert!(added.message.contains("unknown priority"));

        let view = tasks_set_filter(&session, Some("done".to_string()), None, None);
        assert!(!view.ok);
        assert_eq!(view.filter_status, "all");
        assert_eq!(tasks_snapshot(&session).total, 0);
    }

    #[test]
    fn update_unknown_and_delete_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        let updated = tasks_update(
            &session,
            "missing".to_string(),
            Some("t".to_string()),
            None,
            None,
            None,
            None,
            false,
        );
        assert!(!updated.ok);
        assert!(updated.message.contains("task not found"));

        let deleted = tasks_delete(&session, "missing".to_string());
        assert!(deleted.ok);
        assert_eq!(deleted.message, "Nothing to delete.");
    }

    #[test]
    fn update_can_clear_due_date() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);
        let task = tasks_add(
            &session,
            "dated".to_string(),
            String::new(),
            "low".to_string(),
            Some(5_000),
            String::new(),
        )
        .task
        .expect("created task");

        let updated = tasks_update(
            &session,
            task.id.clone(),
            None,
            None,
            Some("HIGH".to_string()),
            None,
            Some(9_000),
            true,
        );
        assert!(updated.ok, "{}", updated.message);
        let updated = updated.task.expect("updated task");
        assert_eq!(updated.due_date, None);
        assert_eq!(updated.priority, "high");
        assert_eq!(updated.created_at, task.created_at);
    }

    #[test]
    fn settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        let loaded = settings_load(&session);
        assert!(loaded.ok);
        assert_eq!(loaded.theme, "system");

        let updated = settings_update(&session, Some("dark".to_string()), Some(false), None);
        assert!(updated.ok);
        assert_eq!(updated.theme, "dark");
        assert!(!updated.notifications);

        let rejected = settings_update(&session, Some("neon".to_string()), None, None);
        assert!(!rejected.ok);
        assert_eq!(rejected.theme, "dark");

        let reopened = session_in(&dir);
        assert_eq!(settings_load(&reopened).theme, "dark");
    }

    #[test]
    fn unreadable_tasks_are_kept_until_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.sqlite3");
        let session = session_in(&dir);
        let mut raw_kv = SqliteKvStore::open(&path).unwrap();
        raw_kv.set("tasks", "{broken").unwrap();

        let view = tasks_load(&session);
        assert!(!view.ok);
        assert!(view.unreadable_storage);

        let added = tasks_add(
            &session,
            "offline".to_string(),
            String::new(),
            "low".to_string(),
            None,
            String::new(),
        );
        assert!(added.ok);
        assert!(added.error.is_some());
        assert_eq!(raw_kv.get("tasks").unwrap().as_deref(), Some("{broken"));

        let view = tasks_overwrite_storage(&session);
        assert!(view.ok, "{}", view.message);
        assert!(!view.unreadable_storage);
        assert!(tasks_load(&session_in(&dir)).ok);
    }

    #[test]
    fn mocked_sign_in_flow() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir);

        let checked = session_check(&session);
        assert!(!checked.ok);
        assert!(!checked.signed_in);

        let rejected = session_login(&session, "me@example.com".to_string(), " ".to_string());
        assert!(!rejected.ok);
        assert!(rejected.message.contains("password is required"));

        let signed_in = session_register(
            &session,
            "me".to_string(),
            "me@example.com".to_string(),
            "pw".to_string(),
        );
        assert!(signed_in.ok, "{}", signed_in.message);
        assert_eq!(signed_in.user.expect("user").username, "me");

        let edited = session_update_user(&session, None, None, Some("avatar.png".to_string()));
        assert_eq!(
            edited.user.and_then(|user| user.profile_image).as_deref(),
            Some("avatar.png")
        );

        let restored = session_check(&session_in(&dir));
        assert!(restored.ok);
        assert!(restored.signed_in);

        assert!(!session_logout(&session).signed_in);
        assert!(!session_check(&session_in(&dir)).signed_in);
        assert!(!session_update_user(&session, Some("x".to_string()), None, None).ok);
    }
}
