//! App settings store.
//!
//! # Responsibility
//! - Hold the current preferences and persist them under one key.
//!
//! # Invariants
//! - A missing settings blob means first launch and yields defaults.
//! - A failed write keeps the merged in-memory settings.

use crate::model::settings::{AppSettings, SettingsPatch};
use crate::repo::kv_repo::KeyValueStore;
use log::{info, warn};

/// Storage key holding the JSON-encoded settings object.
pub const SETTINGS_KEY: &str = "appSettings";

pub struct SettingsStore<S: KeyValueStore> {
    kv: S,
    settings: AppSettings,
    is_loading: bool,
    error: Option<String>,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            settings: AppSettings::default(),
            is_loading: false,
            error: None,
        }
    }

    /// Reads persisted settings.
    ///
    /// Returns `false` and sets `error` when the blob cannot be read or
    /// decoded; current settings are kept in that case.
    pub fn load(&mut self) -> bool {
        self.is_loading = true;
        self.error = None;

        let result = match self.kv.get(SETTINGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<AppSettings>(raw.as_str())
                .map_err(|err| format!("invalid persisted settings: {err}")),
            Ok(None) => Ok(AppSettings::default()),
            Err(err) => Err(format!("failed to read settings: {err}")),
        };
        self.is_loading = false;

        match result {
            Ok(settings) => {
                self.settings = settings;
                info!("event=settings_load module=settings status=ok");
                true
            }
            Err(message) => {
                warn!("event=settings_load module=settings status=error");
                self.error = Some(message);
                false
            }
        }
    }

    /// Merges `patch` and persists the result.
    pub fn update(&mut self, patch: &SettingsPatch) -> &AppSettings {
        self.settings = self.settings.merged(patch);
        self.error = None;

        let write = serde_json::to_string(&self.settings)
            .map_err(|err| format!("failed to encode settings: {err}"))
            .and_then(|encoded| {
                self.kv
                    .set(SETTINGS_KEY, encoded.as_str())
                    .map_err(|err| format!("failed to save settings: {err}"))
            });
        if let Err(message) = write {
            warn!("event=settings_persist module=settings status=error");
            self.error = Some(message);
        }

        &self.settings
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.kv
    }
}

#[cfg(test)]
mod tests {
    use super::{SettingsStore, SETTINGS_KEY};
    use crate::model::settings::{SettingsPatch, ThemeMode};
    use crate::repo::kv_repo::{KeyValueStore, MemoryKvStore};

    #[test]
    fn first_launch_uses_defaults() {
        let mut store = SettingsStore::new(MemoryKvStore::new());
        assert!(store.load());
        assert_eq!(store.settings().language, "en");
    }

    #[test]
    fn update_persists_merged_settings() {
        let mut store = SettingsStore::new(MemoryKvStore::new());
        store.update(&SettingsPatch {
            notifications: Some(false),
            ..SettingsPatch::default()
        });

        let raw = store.storage().get(SETTINGS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"notifications\":false"));
        assert_eq!(store.settings().theme, ThemeMode::System);
    }

    #[test]
    fn malformed_blob_keeps_current_settings() {
        let kv = MemoryKvStore::new().with_entry(SETTINGS_KEY, "{not json");
        let mut store = SettingsStore::new(kv);
        assert!(!store.load());
        assert!(store.error().unwrap_or("").contains("invalid persisted settings"));
        assert_eq!(store.settings().theme, ThemeMode::System);
    }
}
