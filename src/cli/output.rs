use chrono::NaiveDate;
use serde::Serialize;

use crate::model::store::date_key;
use crate::model::task::{Task, TaskId};
use crate::ops::reminder::Reminder;
use crate::ops::view::DayRecord;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: TaskId,
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time: String,
    pub completed: bool,
    pub notified: bool,
}

#[derive(Serialize)]
pub struct DayJson {
    pub date: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct DateCountJson {
    pub date: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub id: TaskId,
    pub date: String,
}

#[derive(Serialize)]
pub struct ChangedJson {
    pub id: TaskId,
    pub date: String,
    pub changed: bool,
}

#[derive(Serialize)]
pub struct ReminderJson {
    pub id: TaskId,
    pub date: String,
    pub time: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id,
        text: task.text.clone(),
        time: task.time.clone(),
        completed: task.completed,
        notified: task.notified,
    }
}

pub fn day_to_json(date: NaiveDate, tasks: &[&Task]) -> DayJson {
    DayJson {
        date: date_key(date),
        tasks: tasks.iter().map(|t| task_to_json(t)).collect(),
    }
}

pub fn record_to_json(record: &DayRecord) -> DayJson {
    DayJson {
        date: date_key(record.date),
        tasks: record.tasks.iter().map(task_to_json).collect(),
    }
}

pub fn reminder_to_json(reminder: &Reminder) -> ReminderJson {
    ReminderJson {
        id: reminder.id,
        date: date_key(reminder.date),
        time: reminder.time.clone(),
        text: reminder.text.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One-line task summary: `[x] 1704067200000 09:00 Buy milk`
pub fn format_task_line(task: &Task) -> String {
    let time = if task.has_time() {
        format!("{} ", task.time)
    } else {
        String::new()
    };
    format!("{} {} {}{}", task.checkbox(), task.id, time, task.text)
}

/// A day's header line with a completion summary
pub fn format_day_header(date: NaiveDate, tasks: &[Task]) -> String {
    let done = tasks.iter().filter(|t| t.completed).count();
    format!(
        "{} {} ({}/{} done)",
        date_key(date),
        date.format("%a"),
        done,
        tasks.len()
    )
}

pub fn format_reminder(reminder: &Reminder) -> String {
    format!(
        "\u{1F514} {} {} {} ({})",
        date_key(reminder.date),
        reminder.time,
        reminder.text,
        reminder.id
    )
}
