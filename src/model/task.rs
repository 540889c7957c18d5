use serde::{Deserialize, Serialize};

/// Task identifier: creation time in milliseconds since the Unix epoch,
/// bumped on collision so it stays unique within a store.
pub type TaskId = i64;

/// A single to-do entry for one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Task text, stored exactly as entered
    pub text: String,
    /// Scheduled reminder time as `HH:MM`, or empty for none
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub completed: bool,
    /// Whether the task is currently being edited (at most one per date)
    #[serde(default)]
    pub editing: bool,
    /// Whether the reminder for this task has already fired
    #[serde(default)]
    pub notified: bool,
}

impl Task {
    /// Create a fresh, incomplete task
    pub fn new(id: TaskId, text: String, time: String) -> Self {
        Task {
            id,
            text,
            time,
            completed: false,
            editing: false,
            notified: false,
        }
    }

    /// Whether a reminder time is set
    pub fn has_time(&self) -> bool {
        !self.time.is_empty()
    }

    /// Checkbox marker used by the CLI and TUI
    pub fn checkbox(&self) -> &'static str {
        if self.completed { "[x]" } else { "[ ]" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_open_and_unnotified() {
        let task = Task::new(1, "Buy milk".into(), "09:00".into());
        assert!(!task.completed);
        assert!(!task.editing);
        assert!(!task.notified);
        assert!(task.has_time());
        assert_eq!(task.checkbox(), "[ ]");
    }

    #[test]
    fn missing_fields_default_on_load() {
        let task: Task = serde_json::from_str(r#"{"id": 7, "text": "Call mom"}"#).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.time, "");
        assert!(!task.completed);
        assert!(!task.editing);
        assert!(!task.notified);
        assert!(!task.has_time());
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let task = Task::new(1704067200000, "Buy milk".into(), "09:00".into());
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1704067200000i64,
                "text": "Buy milk",
                "time": "09:00",
                "completed": false,
                "editing": false,
                "notified": false,
            })
        );
    }
}
