use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::store_io::store_path;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum FileEvent {
    /// The store file was rewritten (possibly by another process).
    StoreChanged,
}

/// Watches the data directory for rewrites of the store file.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

/// Whether a changed path is the store file. Atomic writes land as a
/// rename from a temp file, so the final path is what matters.
fn is_store_file(path: &Path, store_file: &Path) -> bool {
    path.file_name() == store_file.file_name() && path.parent() == store_file.parent()
}

impl StoreWatcher {
    /// Start watching `data_dir`. Call `poll()` each tick.
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let store_file: PathBuf = store_path(data_dir);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                if event.paths.iter().any(|p| is_store_file(p, &store_file)) {
                    let _ = tx.send(FileEvent::StoreChanged);
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. Returns true if the store changed since the last poll
    /// (bursts of events collapse into one).
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(FileEvent::StoreChanged) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_the_store_file() {
        let store = PathBuf::from("/data/dailyTodos.json");
        assert!(is_store_file(Path::new("/data/dailyTodos.json"), &store));
        assert!(!is_store_file(Path::new("/data/.lock"), &store));
        assert!(!is_store_file(Path::new("/data/.tmpXYZ"), &store));
        assert!(!is_store_file(Path::new("/other/dailyTodos.json"), &store));
    }
}
