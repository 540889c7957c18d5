use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml in the data directory.
///
/// Every section is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Drop a date from the store once its last task is deleted.
    /// Default: keep the date around with an empty list.
    #[serde(default)]
    pub prune_empty_days: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Allow editing a task's text down to nothing (adding always requires text)
    #[serde(default = "default_true")]
    pub allow_empty_edit: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            allow_empty_edit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Show desktop notifications when a reminder fires
    #[serde(default = "default_true")]
    pub desktop: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig { desktop: true }
    }
}

/// Light or dark terminal palette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    /// Hex color overrides keyed by theme slot name (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.store.prune_empty_days);
        assert!(config.tasks.allow_empty_edit);
        assert!(config.reminders.desktop);
        assert_eq!(config.ui.theme, ThemeMode::Dark);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config: Config = toml::from_str(
            r##"
[store]
prune_empty_days = true

[ui]
theme = "light"

[ui.colors]
highlight = "#112233"
"##,
        )
        .unwrap();
        assert!(config.store.prune_empty_days);
        assert!(config.tasks.allow_empty_edit);
        assert_eq!(config.ui.theme, ThemeMode::Light);
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#112233");
    }

    #[test]
    fn theme_mode_toggles() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled().as_str(), "dark");
    }
}
