use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::task::{Task, TaskId};

/// Format used for date-keys (`2024-01-01`)
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// All tasks, partitioned by calendar date.
///
/// Dates keep the order in which they were first used. Task lists keep
/// insertion order. A date stays present after its last task is deleted
/// unless the caller prunes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoStore {
    pub days: IndexMap<NaiveDate, Vec<Task>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks for a date (empty slice if the date is unknown)
    pub fn tasks_for(&self, date: NaiveDate) -> &[Task] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable task list for a date, if the date is known
    pub fn tasks_for_mut(&mut self, date: NaiveDate) -> Option<&mut Vec<Task>> {
        self.days.get_mut(&date)
    }

    /// Mutable task list for a date, creating an empty one if needed
    pub fn day_entry(&mut self, date: NaiveDate) -> &mut Vec<Task> {
        self.days.entry(date).or_default()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Largest task id anywhere in the store
    pub fn max_id(&self) -> Option<TaskId> {
        self.days.values().flatten().map(|t| t.id).max()
    }

    /// Total number of tasks across all dates
    pub fn task_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

/// Parse a `YYYY-MM-DD` date-key
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT).ok()
}

/// Format a date as a date-key
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}
