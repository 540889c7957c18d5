use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};

use crate::model::store::parse_date_key;
use crate::ops::view::StatusFilter;

#[derive(Parser)]
#[command(name = "dt", about = concat!("[x] daily-todo v", env!("CARGO_PKG_VERSION"), " - one list per day"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and a commented config.toml
    Init(InitArgs),
    /// Add a task to a day
    Add(AddArgs),
    /// List a day's tasks
    List(ListArgs),
    /// Toggle a task's completion
    Toggle(TaskRefArgs),
    /// Delete a task
    Delete(TaskRefArgs),
    /// Replace a task's text
    Edit(EditArgs),
    /// Show dates that have tasks, with counts
    Dates,
    /// Show all past records, newest date first
    History(HistoryArgs),
    /// Run the reminder scanner in the foreground
    Remind(RemindArgs),
}

/// Parse a date argument: `today`, `yesterday`, `tomorrow`, or `YYYY-MM-DD`
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    let today = Local::now().date_naive();
    match s.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| "date out of range".to_string()),
        "tomorrow" => today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| "date out of range".to_string()),
        other => parse_date_key(other)
            .ok_or_else(|| format!("invalid date '{}': expected YYYY-MM-DD", other)),
    }
}

/// Parse a `YYYY-MM-DD HH:MM` (or `T`-separated) local timestamp
pub fn parse_datetime_arg(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| format!("invalid time '{}': expected \"YYYY-MM-DD HH:MM\"", s))
}

fn parse_filter_arg(s: &str) -> Result<StatusFilter, String> {
    s.parse()
}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Reminder time (HH:MM)
    #[arg(long, short = 't', default_value = "")]
    pub time: String,
    /// Day to add to (default: today)
    #[arg(long, short = 'd', value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Day to list (default: today)
    #[arg(long, short = 'd', value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// Status filter: all, active, completed
    #[arg(long, short = 'f', value_parser = parse_filter_arg, default_value = "all")]
    pub filter: StatusFilter,
    /// Case-insensitive text search
    #[arg(long, short = 's', default_value = "")]
    pub search: String,
}

#[derive(Args)]
pub struct TaskRefArgs {
    /// Task ID
    pub id: i64,
    /// Day the task belongs to (default: today)
    #[arg(long, short = 'd', value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: i64,
    /// New text
    pub text: String,
    /// Day the task belongs to (default: today)
    #[arg(long, short = 'd', value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Maximum number of dates to show
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct RemindArgs {
    /// Scan once and exit instead of every minute
    #[arg(long)]
    pub once: bool,
    /// Scan once as if the local time were this ("YYYY-MM-DD HH:MM")
    #[arg(long, value_parser = parse_datetime_arg)]
    pub at: Option<NaiveDateTime>,
    /// Never show desktop notifications (reminders are still printed)
    #[arg(long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn date_args() {
        assert_eq!(
            parse_date_arg("2024-01-01"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert_eq!(parse_date_arg("Today"), Ok(Local::now().date_naive()));
        assert!(parse_date_arg("2024-13-01").is_err());
    }

    #[test]
    fn datetime_args() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(parse_datetime_arg("2024-01-01 09:00"), Ok(expected));
        assert_eq!(parse_datetime_arg("2024-01-01T09:00"), Ok(expected));
        assert!(parse_datetime_arg("09:00").is_err());
    }

    #[test]
    fn parses_add_with_options() {
        let cli = Cli::parse_from(["dt", "add", "Buy milk", "--time", "09:00", "-d", "2024-01-01"]);
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.text, "Buy milk");
                assert_eq!(args.time, "09:00");
                assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 1, 1));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn parses_list_filter() {
        let cli = Cli::parse_from(["dt", "--json", "list", "--filter", "completed"]);
        assert!(cli.json);
        match cli.command {
            Some(Commands::List(args)) => assert_eq!(args.filter, StatusFilter::Completed),
            _ => panic!("expected list"),
        }
        assert!(Cli::try_parse_from(["dt", "list", "--filter", "later"]).is_err());
    }
}
