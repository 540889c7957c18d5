use std::path::PathBuf;

use super::config::Config;
use super::store::TodoStore;

/// A fully loaded planner: where it lives, how it is configured, and its tasks
#[derive(Debug)]
pub struct Planner {
    /// Data directory holding the store, config, lock and logs
    pub data_dir: PathBuf,
    /// Parsed config.toml (defaults if absent)
    pub config: Config,
    /// The date-keyed task store
    pub store: TodoStore,
}
