use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::io::notifier::{Notifier, Permission};
use crate::model::store::TodoStore;
use crate::model::task::TaskId;
use crate::ops::task_ops::mark_notified;

/// How often the scanner compares the clock against scheduled times
pub const REMINDER_INTERVAL: Duration = Duration::from_secs(60);

/// Title of every reminder notification
pub const REMINDER_TITLE: &str = "\u{1F514} Task Reminder";

/// Source of local wall-clock time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The host's local clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// A reminder that fired on a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub date: NaiveDate,
    pub id: TaskId,
    pub time: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerState {
    /// Waiting for the next tick
    Idle,
    /// Comparing scheduled times against the clock
    Scanning,
}

/// Minute-resolution key for a wall-clock instant (`HH:MM`)
pub fn minute_key(now: NaiveDateTime) -> String {
    now.format("%H:%M").to_string()
}

/// Start of the wall-clock minute containing `now`
fn minute_start(now: NaiveDateTime) -> NaiveDateTime {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Time from `now` until the next wall-clock minute begins
pub fn until_next_minute(now: NaiveDateTime) -> Duration {
    let next = minute_start(now) + TimeDelta::minutes(1);
    (next - now).to_std().unwrap_or(REMINDER_INTERVAL)
}

/// Remembers the last wall-clock minute scanned, so a loop that wakes
/// at any pace scans each minute once. The schedule follows the clock,
/// not the time the previous scan happened to finish.
#[derive(Debug, Clone, Default)]
pub struct MinuteGate {
    last: Option<NaiveDateTime>,
}

impl MinuteGate {
    /// True when `now` is in a minute not scanned yet; records that minute.
    pub fn should_scan(&mut self, now: NaiveDateTime) -> bool {
        let minute = minute_start(now);
        if self.last == Some(minute) {
            return false;
        }
        self.last = Some(minute);
        true
    }
}

/// Reminders due at `now`: tasks dated today, scheduled for the current
/// minute, not yet notified. Skipped minutes are never caught up.
pub fn due_reminders(store: &TodoStore, now: NaiveDateTime) -> Vec<Reminder> {
    let today = now.date();
    let minute = minute_key(now);
    store
        .tasks_for(today)
        .iter()
        .filter(|t| !t.notified && t.time == minute)
        .map(|t| Reminder {
            date: today,
            id: t.id,
            time: t.time.clone(),
            text: t.text.clone(),
        })
        .collect()
}

/// Periodic reminder scanner.
///
/// Owns the notifier and the permission answer it got once at start.
/// Each tick is handed the current store, so marking a task notified
/// never overwrites other changes made since the previous tick.
pub struct ReminderScanner<N: Notifier> {
    notifier: N,
    permission: Option<Permission>,
    state: ScannerState,
}

impl<N: Notifier> ReminderScanner<N> {
    pub fn new(notifier: N) -> Self {
        ReminderScanner {
            notifier,
            permission: None,
            state: ScannerState::Idle,
        }
    }

    /// Ask the notifier for permission. Only the first call reaches the
    /// notifier; the answer is cached for the scanner's lifetime.
    pub fn request_permission(&mut self) -> Permission {
        if let Some(p) = self.permission {
            return p;
        }
        let p = self.notifier.request_permission();
        match p {
            Permission::Granted => log::info!("notification permission granted"),
            Permission::Denied => log::info!("notification permission denied; reminders stay silent"),
        }
        self.permission = Some(p);
        p
    }

    pub fn permission(&self) -> Option<Permission> {
        self.permission
    }

    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run one scan: notify and mark every due task. Returns what fired;
    /// an empty result means the store was not touched.
    pub fn tick(&mut self, store: &mut TodoStore, now: NaiveDateTime) -> Vec<Reminder> {
        self.state = ScannerState::Scanning;
        let due = due_reminders(store, now);
        for reminder in &due {
            if self.permission == Some(Permission::Granted)
                && let Err(e) = self.notifier.show(REMINDER_TITLE, &reminder.text)
            {
                log::warn!("reminder for task {} not shown: {}", reminder.id, e);
            }
            mark_notified(store, reminder.date, reminder.id);
            log::info!(
                "reminder fired for task {} at {} ({})",
                reminder.id,
                reminder.time,
                reminder.date
            );
        }
        self.state = ScannerState::Idle;
        due
    }
}
