//! Append-only recovery log for task data that could not be read or saved,
//! plus the atomic write every durable file goes through.

use std::fmt::{self, Write as _};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tempfile::NamedTempFile;

const LOG_FILE: &str = ".recovery.log";

/// Rotate to `.recovery.log.old` once the log grows past this (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

const FILE_HEADER: &str = "\
# daily-todo recovery log
# Task data that could not be read or saved is appended here, newest last.
# Safe to delete once nothing in it is needed.

";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// The store on disk could not be parsed
    Parser,
    /// The store could not be written
    Write,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecoveryCategory::Parser => "parse",
            RecoveryCategory::Write => "write",
        })
    }
}

/// One incident: what went wrong, where, and the data at stake.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(&'static str, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn render(&self) -> String {
        let mut out = format!(
            "[{}] {}: {}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.category,
            self.description,
        );
        for (key, value) in &self.fields {
            let _ = writeln!(out, "  {}: {}", key, value);
        }
        if !self.body.is_empty() {
            out.push_str(">>>\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("<<<\n");
        }
        out.push('\n');
        out
    }
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

/// Replace `path` with `content` via a sibling temp file and rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append an entry. Failing to log is itself only logged.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = append(data_dir, &entry) {
        log::error!("could not write to recovery log: {}", e);
    }
}

fn append(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    fs::create_dir_all(data_dir)?;
    let path = recovery_log_path(data_dir);

    let len = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    let fresh = if len > MAX_LOG_SIZE {
        fs::rename(&path, path.with_extension("log.old"))?;
        true
    } else {
        len == 0
    };

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if fresh {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.render().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(body: &str) -> RecoveryEntry {
        let mut entry = RecoveryEntry::new(RecoveryCategory::Write, "store write failed")
            .field("Target", "dailyTodos.json")
            .body(body);
        entry.timestamp = DateTime::parse_from_rfc3339("2024-01-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        entry
    }

    #[test]
    fn atomic_write_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f.json");
        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn header_written_once() {
        let dir = TempDir::new().unwrap();
        log_recovery(dir.path(), entry("{}"));
        log_recovery(dir.path(), entry("{\"a\":1}"));
        let content = fs::read_to_string(recovery_log_path(dir.path())).unwrap();
        assert!(content.starts_with("# daily-todo recovery log"));
        assert_eq!(content.matches("# daily-todo recovery log").count(), 1);
        assert_eq!(content.matches("[2024-01-01T09:00:00Z] write").count(), 2);
        assert!(content.contains("  Target: dailyTodos.json\n"));
        assert!(content.contains(">>>\n{\"a\":1}\n<<<\n"));
    }

    #[test]
    fn oversized_log_rotates() {
        let dir = TempDir::new().unwrap();
        let path = recovery_log_path(dir.path());
        fs::write(&path, vec![b'x'; MAX_LOG_SIZE as usize + 1]).unwrap();
        log_recovery(dir.path(), entry(""));
        assert!(path.with_extension("log.old").exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# daily-todo recovery log"));
    }

    #[test]
    fn entry_without_body() {
        let text = entry("").render();
        assert_eq!(
            text,
            "[2024-01-01T09:00:00Z] write: store write failed\n  Target: dailyTodos.json\n\n"
        );
    }
}
