use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_FILE: &str = ".lock";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Exclusive advisory lock on a data directory, held for one
/// read-modify-write of the store.
///
/// The TUI, one-shot CLI commands and a running `dt remind` all take it,
/// so their writes never interleave. Released on drop.
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError { path: PathBuf, source: io::Error },
    #[error("could not acquire lock on {path}: another dt process may be writing")]
    Timeout { path: PathBuf },
}

impl FileLock {
    /// Lock `data_dir`, creating it if needed, waiting at most `timeout`.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let file = open_lock_file(data_dir, &path).map_err(|source| LockError::CreateError {
            path: path.clone(),
            source,
        })?;

        let deadline = Instant::now() + timeout;
        while let Err(e) = try_lock(&file) {
            if Instant::now() >= deadline {
                log::debug!("lock on {} still held: {}", path.display(), e);
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }
        log::trace!("locked {}", path.display());
        Ok(FileLock { _file: file, path })
    }

    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, DEFAULT_TIMEOUT)
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Closing the file releases the flock. The file stays so a waiter
        // never locks an unlinked inode.
        log::trace!("released {}", self.path.display());
    }
}

fn open_lock_file(data_dir: &Path, path: &Path) -> io::Result<File> {
    fs::create_dir_all(data_dir)?;
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
}

#[cfg(unix)]
fn try_lock(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the fd is owned by `file`, which outlives the call
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn relock_after_drop() {
        let tmp = TempDir::new().unwrap();
        let lock = FileLock::acquire_default(tmp.path()).unwrap();
        drop(lock);
        assert!(FileLock::acquire_default(tmp.path()).is_ok());
        assert!(tmp.path().join(".lock").exists());
    }

    #[test]
    fn creates_missing_data_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("fresh");
        let _lock = FileLock::acquire_default(&dir).unwrap();
        assert!(dir.join(".lock").exists());
    }

    #[cfg(unix)]
    #[test]
    fn second_holder_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = FileLock::acquire_default(tmp.path()).unwrap();
        let waiting = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(waiting, Err(LockError::Timeout { .. })));
    }
}
