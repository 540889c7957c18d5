pub mod config_io;
pub mod lock;
pub mod notifier;
pub mod recovery;
pub mod store_io;
pub mod watcher;
