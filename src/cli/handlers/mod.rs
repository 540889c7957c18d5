mod init;
pub use init::cmd_init;

use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::lock::FileLock;
use crate::io::notifier::{DesktopNotifier, Notifier};
use crate::io::store_io::{self, StoreError};
use crate::model::planner::Planner;
use crate::model::store::date_key;
use crate::ops::reminder::{
    Clock, FixedClock, MinuteGate, REMINDER_INTERVAL, ReminderScanner, SystemClock,
    until_next_minute,
};
use crate::ops::task_ops::{self, EditPolicy};
use crate::ops::view::{self, ViewQuery};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(
    command: Commands,
    data_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Init(args) => cmd_init(data_dir, args),

        // Read commands
        Commands::List(args) => cmd_list(data_dir, args, json),
        Commands::Dates => cmd_dates(data_dir, json),
        Commands::History(args) => cmd_history(data_dir, args, json),

        // Write commands
        Commands::Add(args) => cmd_add(data_dir, args, json),
        Commands::Toggle(args) => cmd_toggle(data_dir, args, json),
        Commands::Delete(args) => cmd_delete(data_dir, args, json),
        Commands::Edit(args) => cmd_edit(data_dir, args, json),

        // Reminders
        Commands::Remind(args) => cmd_remind(data_dir, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn load(data_dir: &Path) -> Result<Planner, StoreError> {
    store_io::load_planner(data_dir)
}

/// Report the outcome of a by-id mutation. A missing task is not an error.
fn report_change(
    verb: &str,
    id: i64,
    date: NaiveDate,
    changed: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let out = ChangedJson {
            id,
            date: date_key(date),
            changed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if changed {
        println!("{} {}", verb, id);
    } else {
        println!("no task {} on {}", id, date_key(date));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(data_dir: &Path, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let planner = load(data_dir)?;
    let query = ViewQuery {
        date: args.date.unwrap_or_else(today),
        filter: args.filter,
        search: args.search,
    };
    let tasks = view::visible_tasks(&planner.store, &query);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&day_to_json(query.date, &tasks))?
        );
    } else {
        println!(
            "{}",
            format_day_header(query.date, planner.store.tasks_for(query.date))
        );
        if tasks.is_empty() {
            println!("  (no tasks)");
        }
        for task in &tasks {
            println!("  {}", format_task_line(task));
        }
    }
    Ok(())
}

fn cmd_dates(data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let planner = load(data_dir)?;
    let dates = view::dates_with_tasks(&planner.store);

    if json {
        let items: Vec<DateCountJson> = dates
            .iter()
            .map(|(date, count)| DateCountJson {
                date: date_key(*date),
                count: *count,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for (date, count) in &dates {
            println!("{} ({})", date_key(*date), count);
        }
    }
    Ok(())
}

fn cmd_history(
    data_dir: &Path,
    args: HistoryArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let planner = load(data_dir)?;
    let mut days = view::history(&planner.store);
    if let Some(limit) = args.limit {
        days.truncate(limit);
    }

    if json {
        let items: Vec<DayJson> = days.iter().map(record_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for (i, day) in days.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{}", format_day_header(day.date, day.tasks));
            for task in day.tasks {
                println!("  {}", format_task_line(task));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(data_dir: &Path, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let _lock = FileLock::acquire_default(data_dir)?;
    let mut planner = load(data_dir)?;
    let date = args.date.unwrap_or_else(today);

    let id = task_ops::add_task(&mut planner.store, date, &args.text, &args.time)?;
    store_io::save_planner(&planner)?;

    if json {
        let out = AddedJson {
            id,
            date: date_key(date),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_toggle(
    data_dir: &Path,
    args: TaskRefArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let _lock = FileLock::acquire_default(data_dir)?;
    let mut planner = load(data_dir)?;
    let date = args.date.unwrap_or_else(today);

    let changed = task_ops::toggle_complete(&mut planner.store, date, args.id);
    if changed {
        store_io::save_planner(&planner)?;
    }
    report_change("toggled", args.id, date, changed, json)
}

fn cmd_delete(
    data_dir: &Path,
    args: TaskRefArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let _lock = FileLock::acquire_default(data_dir)?;
    let mut planner = load(data_dir)?;
    let date = args.date.unwrap_or_else(today);
    let prune = planner.config.store.prune_empty_days;

    let changed = task_ops::delete_task(&mut planner.store, date, args.id, prune);
    if changed {
        store_io::save_planner(&planner)?;
    }
    report_change("deleted", args.id, date, changed, json)
}

fn cmd_edit(data_dir: &Path, args: EditArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let _lock = FileLock::acquire_default(data_dir)?;
    let mut planner = load(data_dir)?;
    let date = args.date.unwrap_or_else(today);
    let policy = EditPolicy::from_allow_empty(planner.config.tasks.allow_empty_edit);

    let changed = task_ops::set_text(&mut planner.store, date, args.id, &args.text, policy)?;
    if changed {
        store_io::save_planner(&planner)?;
    }
    report_change("edited", args.id, date, changed, json)
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

fn cmd_remind(
    data_dir: &Path,
    args: RemindArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = crate::io::config_io::read_config(data_dir)?;
    let mut scanner = ReminderScanner::new(DesktopNotifier::new(
        config.reminders.desktop && !args.quiet,
    ));
    scanner.request_permission();

    if let Some(at) = args.at {
        return scan_once(data_dir, &mut scanner, &FixedClock(at), Output::batch(json));
    }
    if args.once {
        return scan_once(data_dir, &mut scanner, &SystemClock, Output::batch(json));
    }

    log::info!(
        "reminder scanner started for {} (every {}s)",
        data_dir.display(),
        REMINDER_INTERVAL.as_secs()
    );
    // Scans follow the wall-clock minute, so time spent scanning never
    // pushes the next scan past a minute boundary
    let mut gate = MinuteGate::default();
    loop {
        let now = SystemClock.now();
        if !gate.should_scan(now) {
            std::thread::sleep(until_next_minute(now));
            continue;
        }
        if let Err(e) = scan_once(data_dir, &mut scanner, &FixedClock(now), Output::stream(json)) {
            log::warn!("reminder scan failed: {}", e);
        }
    }
}

/// How a scan reports what fired
#[derive(Clone, Copy)]
enum Output {
    Text,
    /// One JSON array per scan, empty included
    JsonArray,
    /// One JSON object per line, nothing for quiet minutes
    JsonLines,
}

impl Output {
    fn batch(json: bool) -> Self {
        if json { Output::JsonArray } else { Output::Text }
    }

    fn stream(json: bool) -> Self {
        if json { Output::JsonLines } else { Output::Text }
    }
}

/// One scan against the store as it is on disk right now. Only the
/// `notified` flags of fired tasks are written back.
fn scan_once<N: Notifier>(
    data_dir: &Path,
    scanner: &mut ReminderScanner<N>,
    clock: &dyn Clock,
    output: Output,
) -> Result<(), Box<dyn std::error::Error>> {
    let _lock = FileLock::acquire_default(data_dir)?;
    let mut store = store_io::load_store(data_dir)?;
    let fired = scanner.tick(&mut store, clock.now());
    if !fired.is_empty() {
        store_io::save_store(data_dir, &store)?;
    }

    match output {
        Output::Text => {
            for reminder in &fired {
                println!("{}", format_reminder(reminder));
            }
        }
        Output::JsonArray => {
            let items: Vec<ReminderJson> = fired.iter().map(reminder_to_json).collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Output::JsonLines => {
            for reminder in &fired {
                println!("{}", serde_json::to_string(&reminder_to_json(reminder))?);
            }
        }
    }
    Ok(())
}
