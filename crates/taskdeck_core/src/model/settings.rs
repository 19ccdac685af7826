//! App settings model.

use serde::{Deserialize, Serialize};

/// Color scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_notifications")]
    pub notifications: bool,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            notifications: default_notifications(),
            language: default_language(),
        }
    }
}

/// Partial settings update; `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsPatch {
    pub theme: Option<ThemeMode>,
    pub notifications: Option<bool>,
    pub language: Option<String>,
}

impl AppSettings {
    /// Returns a copy with `patch` overlaid.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            theme: patch.theme.unwrap_or(self.theme),
            notifications: patch.notifications.unwrap_or(self.notifications),
            language: patch
                .language
                .clone()
                .unwrap_or_else(|| self.language.clone()),
        }
    }
}

fn default_notifications() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}
