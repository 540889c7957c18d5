use std::fs;
use std::path::{Path, PathBuf};

use crate::io::config_io;
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::planner::Planner;
use crate::model::store::TodoStore;

/// Storage slot holding the whole store
pub const STORE_SLOT: &str = "dailyTodos";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "DAILY_TODO_DIR";

/// Error type for store and config I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize store: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Path of the store file inside a data directory
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{}.json", STORE_SLOT))
}

/// Resolve the data directory: explicit override, then `$DAILY_TODO_DIR`,
/// then `$XDG_DATA_HOME/daily-todo`, then `~/.local/share/daily-todo`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    let data_home = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
    data_home.join("daily-todo")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the store from the data directory.
///
/// A missing file is an empty store. A file that does not parse is backed
/// up as `.json.bak`, recorded in the recovery log, and replaced by an
/// empty store so the next save does not lose the original bytes.
pub fn load_store(data_dir: &Path) -> Result<TodoStore, StoreError> {
    let path = store_path(data_dir);
    if !path.exists() {
        log::debug!("no store at {}, starting empty", path.display());
        return Ok(TodoStore::new());
    }
    let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    if content.trim().is_empty() {
        return Ok(TodoStore::new());
    }
    match serde_json::from_str::<TodoStore>(&content) {
        Ok(store) => {
            log::debug!(
                "loaded {} tasks over {} dates from {}",
                store.task_count(),
                store.days.len(),
                path.display()
            );
            Ok(store)
        }
        Err(e) => {
            let bak = path.with_extension("json.bak");
            let mut entry = RecoveryEntry::new(
                RecoveryCategory::Parser,
                "unreadable store replaced by empty store",
            )
            .field("Source", path.display());
            match fs::copy(&path, &bak) {
                Ok(_) => {
                    log::warn!(
                        "could not parse {} (backed up as {}): {}",
                        path.display(),
                        bak.display(),
                        e
                    );
                    entry = entry.field("Backup", bak.display());
                }
                Err(copy_err) => {
                    log::warn!("could not parse {}: {}", path.display(), e);
                    log::error!("could not back up {}: {}", path.display(), copy_err);
                    entry = entry.field("Backup failed", &copy_err);
                }
            }
            recovery::log_recovery(data_dir, entry.field("Error", &e).body(content));
            Ok(TodoStore::new())
        }
    }
}

/// Write the whole store back to disk atomically.
///
/// On failure the serialized snapshot is appended to the recovery log
/// before the error is returned.
pub fn save_store(data_dir: &Path, store: &TodoStore) -> Result<(), StoreError> {
    let path = store_path(data_dir);
    let content = serde_json::to_string_pretty(store)?;
    let result = fs::create_dir_all(data_dir)
        .and_then(|_| recovery::atomic_write(&path, content.as_bytes()));
    if let Err(e) = result {
        recovery::log_recovery(
            data_dir,
            RecoveryEntry::new(RecoveryCategory::Write, "store write failed")
                .field("Target", path.display())
                .field("Error", &e)
                .body(content),
        );
        return Err(StoreError::WriteError { path, source: e });
    }
    log::debug!("saved {} tasks to {}", store.task_count(), path.display());
    Ok(())
}

/// Load config and store from a data directory
pub fn load_planner(data_dir: &Path) -> Result<Planner, StoreError> {
    let config = config_io::read_config(data_dir)?;
    let store = load_store(data_dir)?;
    Ok(Planner {
        data_dir: data_dir.to_path_buf(),
        config,
        store,
    })
}

/// Save a planner's store
pub fn save_planner(planner: &Planner) -> Result<(), StoreError> {
    save_store(&planner.data_dir, &planner.store)
}
