use chrono::{NaiveDate, NaiveTime, Utc};

use crate::model::store::TodoStore;
use crate::model::task::{Task, TaskId};

/// Error type for task operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task text cannot be empty")]
    EmptyText,
    #[error("invalid time {0:?}: expected HH:MM")]
    InvalidTime(String),
}

/// Whether `set_text` accepts empty text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPolicy {
    /// Any text, including empty (clearing a task's text is allowed)
    #[default]
    AllowEmpty,
    /// Same rule as adding: text must contain a non-whitespace character
    RequireText,
}

impl EditPolicy {
    pub fn from_allow_empty(allow_empty: bool) -> Self {
        if allow_empty {
            EditPolicy::AllowEmpty
        } else {
            EditPolicy::RequireText
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task(store: &TodoStore, date: NaiveDate, id: TaskId) -> Option<&Task> {
    store.tasks_for(date).iter().find(|t| t.id == id)
}

pub fn find_task_mut(store: &mut TodoStore, date: NaiveDate, id: TaskId) -> Option<&mut Task> {
    store
        .tasks_for_mut(date)?
        .iter_mut()
        .find(|t| t.id == id)
}

/// Next unique task id: `now_ms`, or one past the largest existing id
/// when the clock has not moved past it.
pub fn next_task_id(store: &TodoStore, now_ms: TaskId) -> TaskId {
    match store.max_id() {
        Some(max) if max >= now_ms => max + 1,
        _ => now_ms,
    }
}

/// Validate and normalize a reminder time. Empty means "no reminder".
/// Accepts `9:05` and `09:05`, returns the zero-padded `HH:MM` form.
pub fn normalize_time(time: &str) -> Result<String, TaskError> {
    let time = time.trim();
    if time.is_empty() {
        return Ok(String::new());
    }
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| TaskError::InvalidTime(time.to_string()))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Add a task to the end of a date's list, creating the date if needed.
/// Returns the new task's id.
pub fn add_task(
    store: &mut TodoStore,
    date: NaiveDate,
    text: &str,
    time: &str,
) -> Result<TaskId, TaskError> {
    add_task_at(store, date, text, time, Utc::now().timestamp_millis())
}

/// `add_task` with an explicit creation timestamp
pub fn add_task_at(
    store: &mut TodoStore,
    date: NaiveDate,
    text: &str,
    time: &str,
    now_ms: TaskId,
) -> Result<TaskId, TaskError> {
    if text.trim().is_empty() {
        return Err(TaskError::EmptyText);
    }
    let time = normalize_time(time)?;
    let id = next_task_id(store, now_ms);
    store
        .day_entry(date)
        .push(Task::new(id, text.to_string(), time));
    Ok(id)
}

/// Flip a task's completion. Returns false if no such task.
pub fn toggle_complete(store: &mut TodoStore, date: NaiveDate, id: TaskId) -> bool {
    match find_task_mut(store, date, id) {
        Some(task) => {
            task.completed = !task.completed;
            true
        }
        None => false,
    }
}

/// Remove a task. With `prune`, a date whose list becomes empty is dropped.
/// Returns false if no such task.
pub fn delete_task(store: &mut TodoStore, date: NaiveDate, id: TaskId, prune: bool) -> bool {
    let Some(tasks) = store.tasks_for_mut(date) else {
        return false;
    };
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    let removed = tasks.len() != before;
    if removed && prune && tasks.is_empty() {
        store.days.shift_remove(&date);
    }
    removed
}

/// Replace a task's text. Returns Ok(false) if no such task.
pub fn set_text(
    store: &mut TodoStore,
    date: NaiveDate,
    id: TaskId,
    text: &str,
    policy: EditPolicy,
) -> Result<bool, TaskError> {
    if policy == EditPolicy::RequireText && text.trim().is_empty() {
        return Err(TaskError::EmptyText);
    }
    match find_task_mut(store, date, id) {
        Some(task) => {
            task.text = text.to_string();
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Put one task into (or out of) edit mode. Every other task on the same
/// date leaves edit mode. Returns false if no such task.
pub fn set_editing(store: &mut TodoStore, date: NaiveDate, id: TaskId, editing: bool) -> bool {
    let Some(tasks) = store.tasks_for_mut(date) else {
        return false;
    };
    if !tasks.iter().any(|t| t.id == id) {
        return false;
    }
    for task in tasks.iter_mut() {
        task.editing = task.id == id && editing;
    }
    true
}

/// Clear edit mode on every task of a date
pub fn clear_editing(store: &mut TodoStore, date: NaiveDate) {
    if let Some(tasks) = store.tasks_for_mut(date) {
        for task in tasks.iter_mut() {
            task.editing = false;
        }
    }
}

/// Record that a task's reminder has fired. Returns false if no such task
/// or it was already marked.
pub fn mark_notified(store: &mut TodoStore, date: NaiveDate, id: TaskId) -> bool {
    match find_task_mut(store, date, id) {
        Some(task) if !task.notified => {
            task.notified = true;
            true
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
