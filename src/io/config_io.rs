use std::fs;
use std::path::{Path, PathBuf};

use crate::io::store_io::StoreError;
use crate::model::config::{Config, ThemeMode};

/// Commented template written by `dt init`
pub const CONFIG_TEMPLATE: &str = r##"# daily-todo configuration

[store]
# Drop a date once its last task is deleted (default: keep it)
prune_empty_days = false

[tasks]
# Allow editing a task's text down to nothing
allow_empty_edit = true

[reminders]
# Show a desktop notification when a task's time arrives
desktop = true

[ui]
# "dark" or "light"
theme = "dark"

[ui.colors]
# highlight = "#FB4196"
"##;

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Read config.toml, falling back to defaults when it does not exist.
pub fn read_config(data_dir: &Path) -> Result<Config, StoreError> {
    let path = config_path(data_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Read config.toml as a toml_edit document for round-trip-safe editing.
/// A missing file yields an empty document.
pub fn read_config_doc(data_dir: &Path) -> Result<toml_edit::DocumentMut, StoreError> {
    let path = config_path(data_dir);
    if !path.exists() {
        return Ok(toml_edit::DocumentMut::new());
    }
    let text = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    text.parse::<toml_edit::DocumentMut>()
        .map_err(|e| StoreError::IoError(std::io::Error::other(e.to_string())))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config_doc(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), StoreError> {
    let path = config_path(data_dir);
    fs::create_dir_all(data_dir)?;
    fs::write(&path, doc.to_string()).map_err(|e| StoreError::WriteError { path, source: e })
}

/// Set `[ui] theme` in the config document
pub fn set_theme(doc: &mut toml_edit::DocumentMut, mode: ThemeMode) {
    if !doc.contains_key("ui") {
        doc["ui"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["ui"]["theme"] = toml_edit::value(mode.as_str());
}

/// Persist a theme choice into config.toml
pub fn save_theme(data_dir: &Path, mode: ThemeMode) -> Result<(), StoreError> {
    let mut doc = read_config_doc(data_dir)?;
    set_theme(&mut doc, mode);
    write_config_doc(data_dir, &doc)
}

/// Write the config template unless a config already exists (or `force`).
/// Returns true if a file was written.
pub fn write_default_config(data_dir: &Path, force: bool) -> Result<bool, StoreError> {
    let path = config_path(data_dir);
    if path.exists() && !force {
        return Ok(false);
    }
    fs::create_dir_all(data_dir)?;
    fs::write(&path, CONFIG_TEMPLATE).map_err(|e| StoreError::WriteError { path, source: e })?;
    Ok(true)
}
