use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::model::store::TodoStore;
use crate::model::task::Task;

/// Status filter for the displayed list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Not yet completed
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }

    /// all → active → completed → all
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(format!(
                "invalid filter '{}': expected all, active or completed",
                other
            )),
        }
    }
}

/// The three transient inputs that select what is displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub date: NaiveDate,
    pub filter: StatusFilter,
    pub search: String,
}

impl ViewQuery {
    pub fn for_date(date: NaiveDate) -> Self {
        ViewQuery {
            date,
            filter: StatusFilter::All,
            search: String::new(),
        }
    }
}

/// Case-insensitive substring match. An empty term matches everything.
pub fn text_matches(text: &str, search: &str) -> bool {
    search.is_empty() || text.to_lowercase().contains(&search.to_lowercase())
}

/// Tasks to display for a query, in insertion order
pub fn visible_tasks<'a>(store: &'a TodoStore, query: &ViewQuery) -> Vec<&'a Task> {
    store
        .tasks_for(query.date)
        .iter()
        .filter(|t| query.filter.matches(t))
        .filter(|t| text_matches(&t.text, &query.search))
        .collect()
}

/// One date's full, unfiltered task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord<'a> {
    pub date: NaiveDate,
    pub tasks: &'a [Task],
}

impl DayRecord<'_> {
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

/// Past records: every date with at least one task, newest first
pub fn history(store: &TodoStore) -> Vec<DayRecord<'_>> {
    let mut days: Vec<DayRecord> = store
        .days
        .iter()
        .filter(|(_, tasks)| !tasks.is_empty())
        .map(|(date, tasks)| DayRecord {
            date: *date,
            tasks: tasks.as_slice(),
        })
        .collect();
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

/// Dates that have tasks, in the order they were first used, with counts
pub fn dates_with_tasks(store: &TodoStore) -> Vec<(NaiveDate, usize)> {
    store
        .days
        .iter()
        .filter(|(_, tasks)| !tasks.is_empty())
        .map(|(date, tasks)| (*date, tasks.len()))
        .collect()
}
