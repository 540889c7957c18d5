use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::notifier::{DesktopNotifier, Notifier};
use crate::io::store_io::{self, store_path};
use crate::io::watcher::StoreWatcher;
use crate::model::{Planner, TaskId, ThemeMode, TodoStore};
use crate::ops::reminder::{Clock, MinuteGate, ReminderScanner, SystemClock, due_reminders};
use crate::ops::task_ops::{self, EditPolicy, TaskError};
use crate::ops::view::{self, StatusFilter, ViewQuery};
use crate::util::unicode;

use super::input;
use super::render;
use super::theme::Theme;

/// How long a toast stays in the status row
pub const STATUS_TTL: Duration = Duration::from_secs(3);

pub const MSG_ADDED: &str = "\u{2705} Task added successfully!";
pub const MSG_EMPTY: &str = "\u{274C} Please enter a task.";
pub const MSG_DELETED: &str = "\u{1F5D1}\u{FE0F} Task deleted.";
pub const MSG_UPDATED: &str = "\u{270F}\u{FE0F} Task updated.";

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// One day's list
    Day,
    /// Past records: every date with tasks, newest first
    History,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Add form open
    Add,
    /// Inline edit of one task's text
    Edit,
    Search,
    /// Typing a date to jump to
    GoTo,
}

/// Single-line text input. `cursor` is a byte offset on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub text: String,
    pub cursor: usize,
}

impl TextField {
    pub fn with_text(text: &str) -> Self {
        TextField {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.text.drain(self.cursor..next);
        }
    }

    /// Delete the word before the cursor (Ctrl+W)
    pub fn delete_word(&mut self) {
        let start = unicode::word_boundary_left(&self.text, self.cursor);
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn word_left(&mut self) {
        self.cursor = unicode::word_boundary_left(&self.text, self.cursor);
    }

    pub fn word_right(&mut self) {
        self.cursor = unicode::word_boundary_right(&self.text, self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Cursor position in terminal cells
    pub fn cursor_col(&self) -> usize {
        unicode::byte_offset_to_display_col(&self.text, self.cursor)
    }
}

/// Which add-form input has focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddField {
    #[default]
    Text,
    Time,
}

/// The add form: task text plus an optional `HH:MM` reminder time
#[derive(Debug, Clone, Default)]
pub struct AddForm {
    pub text: TextField,
    pub time: TextField,
    pub field: AddField,
}

impl AddForm {
    pub fn active_mut(&mut self) -> &mut TextField {
        match self.field {
            AddField::Text => &mut self.text,
            AddField::Time => &mut self.time,
        }
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            AddField::Text => AddField::Time,
            AddField::Time => AddField::Text,
        };
    }

    pub fn reset(&mut self) {
        *self = AddForm::default();
    }
}

/// A transient toast shown in the status row
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// Main application state
pub struct App {
    pub planner: Planner,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme_mode: ThemeMode,
    pub theme: Theme,
    /// Date whose list is shown
    pub date: NaiveDate,
    pub filter: StatusFilter,
    /// Live search text (filters the list while typing)
    pub search: TextField,
    /// Cursor into the visible list of the day view
    pub cursor: usize,
    /// Cursor into the past-records list
    pub history_cursor: usize,
    pub add_form: AddForm,
    /// Task being edited inline, and its buffer
    pub edit_id: Option<TaskId>,
    pub edit_field: TextField,
    pub goto_field: TextField,
    pub show_help: bool,
    pub status: Option<StatusMessage>,
    /// Modification time of the store file as of our last load or save
    store_mtime: Option<SystemTime>,
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl App {
    pub fn new(planner: Planner, date: NaiveDate) -> Self {
        let theme_mode = planner.config.ui.theme;
        let theme = Theme::from_config(&planner.config.ui);
        let store_mtime = file_mtime(&store_path(&planner.data_dir));

        let mut app = App {
            planner,
            view: View::Day,
            mode: Mode::Navigate,
            should_quit: false,
            theme_mode,
            theme,
            date,
            filter: StatusFilter::All,
            search: TextField::default(),
            cursor: 0,
            history_cursor: 0,
            add_form: AddForm::default(),
            edit_id: None,
            edit_field: TextField::default(),
            goto_field: TextField::default(),
            show_help: false,
            status: None,
            store_mtime,
        };
        app.resume_edit();
        app
    }

    pub fn store(&self) -> &TodoStore {
        &self.planner.store
    }

    pub fn query(&self) -> ViewQuery {
        ViewQuery {
            date: self.date,
            filter: self.filter,
            search: self.search.text.clone(),
        }
    }

    /// IDs of the tasks currently shown, in display order
    pub fn visible_ids(&self) -> Vec<TaskId> {
        view::visible_tasks(&self.planner.store, &self.query())
            .iter()
            .map(|t| t.id)
            .collect()
    }

    pub fn cursor_task_id(&self) -> Option<TaskId> {
        self.visible_ids().get(self.cursor).copied()
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_ids().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
        let days = view::history(&self.planner.store).len();
        self.history_cursor = self.history_cursor.min(days.saturating_sub(1));
    }

    pub fn move_cursor(&mut self, delta: i32) {
        match self.view {
            View::Day => {
                let len = self.visible_ids().len();
                self.cursor = step(self.cursor, delta, len);
            }
            View::History => {
                let len = view::history(&self.planner.store).len();
                self.history_cursor = step(self.history_cursor, delta, len);
            }
        }
    }

    /// Case-insensitive literal matcher for the current search text
    pub fn search_re(&self) -> Option<Regex> {
        let needle = &self.search.text;
        if needle.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(needle))).ok()
    }

    // -----------------------------------------------------------------------
    // Status toasts
    // -----------------------------------------------------------------------

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    pub fn expire_status(&mut self, now: Instant) {
        if let Some(ref s) = self.status
            && now.duration_since(s.shown_at) >= STATUS_TTL
        {
            self.status = None;
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Reload the store if another process rewrote it since our last load
    /// or save. Returns true if a reload happened.
    pub fn reload_if_changed(&mut self) -> bool {
        let path = store_path(&self.planner.data_dir);
        let mtime = file_mtime(&path);
        if mtime == self.store_mtime {
            return false;
        }
        match store_io::load_store(&self.planner.data_dir) {
            Ok(store) => {
                log::info!("store changed on disk, reloaded {}", path.display());
                self.planner.store = store;
                self.store_mtime = mtime;
                if let Some(id) = self.edit_id
                    && task_ops::find_task(&self.planner.store, self.date, id).is_none()
                {
                    self.edit_id = None;
                    self.edit_field.clear();
                    if self.mode == Mode::Edit {
                        self.mode = Mode::Navigate;
                    }
                }
                self.clamp_cursor();
                true
            }
            Err(e) => {
                log::error!("reload failed: {}", e);
                self.set_error(format!("\u{274C} {}", e));
                false
            }
        }
    }

    /// Apply one mutation under the data-directory lock, against the store
    /// as it is on disk, then save. Validation errors become a toast and
    /// leave the store unsaved.
    pub fn mutate<R>(
        &mut self,
        f: impl FnOnce(&mut TodoStore) -> Result<R, TaskError>,
    ) -> Option<R> {
        let _lock = match FileLock::acquire_default(&self.planner.data_dir) {
            Ok(lock) => lock,
            Err(e) => {
                self.set_error(format!("\u{274C} {}", e));
                return None;
            }
        };
        self.reload_if_changed();

        let result = match f(&mut self.planner.store) {
            Ok(r) => r,
            Err(TaskError::EmptyText) => {
                self.set_error(MSG_EMPTY);
                return None;
            }
            Err(e) => {
                self.set_error(format!("\u{274C} {}", e));
                return None;
            }
        };

        match store_io::save_planner(&self.planner) {
            Ok(()) => {
                self.store_mtime = file_mtime(&store_path(&self.planner.data_dir));
            }
            Err(e) => {
                log::error!("save failed: {}", e);
                self.set_error(format!("\u{274C} {}", e));
            }
        }
        Some(result)
    }

    // -----------------------------------------------------------------------
    // Task actions
    // -----------------------------------------------------------------------

    /// Submit the add form. An empty text keeps the form open with a toast.
    pub fn submit_add(&mut self) {
        let text = self.add_form.text.text.clone();
        if text.trim().is_empty() {
            self.set_error(MSG_EMPTY);
            return;
        }
        let time = self.add_form.time.text.clone();
        let date = self.date;
        if let Some(id) = self.mutate(|store| task_ops::add_task(store, date, &text, &time)) {
            self.add_form.reset();
            self.mode = Mode::Navigate;
            // Land on the new task if it is visible under the current filter
            if let Some(pos) = self.visible_ids().iter().position(|&t| t == id) {
                self.cursor = pos;
            }
            self.set_status(MSG_ADDED);
        }
    }

    pub fn toggle_cursor(&mut self) {
        let Some(id) = self.cursor_task_id() else {
            return;
        };
        let date = self.date;
        self.mutate(|store| Ok(task_ops::toggle_complete(store, date, id)));
        self.clamp_cursor();
    }

    pub fn delete_cursor(&mut self) {
        let Some(id) = self.cursor_task_id() else {
            return;
        };
        let date = self.date;
        let prune = self.planner.config.store.prune_empty_days;
        if self.mutate(|store| Ok(task_ops::delete_task(store, date, id, prune))) == Some(true) {
            if self.edit_id == Some(id) {
                self.edit_id = None;
            }
            self.set_status(MSG_DELETED);
        }
        self.clamp_cursor();
    }

    /// Put the cursor task into edit mode. Any other task on the day
    /// leaves edit mode.
    pub fn begin_edit(&mut self) {
        let Some(id) = self.cursor_task_id() else {
            return;
        };
        let date = self.date;
        if self.mutate(|store| Ok(task_ops::set_editing(store, date, id, true))) != Some(true) {
            return;
        }
        let text = task_ops::find_task(&self.planner.store, date, id)
            .map(|t| t.text.clone())
            .unwrap_or_default();
        self.edit_id = Some(id);
        self.edit_field = TextField::with_text(&text);
        self.mode = Mode::Edit;
    }

    pub fn confirm_edit(&mut self) {
        let Some(id) = self.edit_id else {
            self.mode = Mode::Navigate;
            return;
        };
        let date = self.date;
        let text = self.edit_field.text.clone();
        let policy = EditPolicy::from_allow_empty(self.planner.config.tasks.allow_empty_edit);
        let saved = self.mutate(|store| {
            let changed = task_ops::set_text(store, date, id, &text, policy)?;
            task_ops::set_editing(store, date, id, false);
            Ok(changed)
        });
        // A rejected edit keeps the input open
        if saved.is_some() {
            self.edit_id = None;
            self.edit_field.clear();
            self.mode = Mode::Navigate;
            self.set_status(MSG_UPDATED);
            self.clamp_cursor();
        }
    }

    pub fn cancel_edit(&mut self) {
        let date = self.date;
        if self.edit_id.take().is_some() {
            self.mutate(|store| {
                task_ops::clear_editing(store, date);
                Ok(())
            });
        }
        self.edit_field.clear();
        self.mode = Mode::Navigate;
    }

    /// Re-open the inline editor for a task that was left in edit mode
    fn resume_edit(&mut self) {
        let Some((id, text)) = self
            .planner
            .store
            .tasks_for(self.date)
            .iter()
            .find(|t| t.editing)
            .map(|t| (t.id, t.text.clone()))
        else {
            return;
        };
        self.edit_id = Some(id);
        self.edit_field = TextField::with_text(&text);
        self.mode = Mode::Edit;
        if let Some(pos) = self.visible_ids().iter().position(|&t| t == id) {
            self.cursor = pos;
        }
    }

    // -----------------------------------------------------------------------
    // Date, filter, theme
    // -----------------------------------------------------------------------

    pub fn select_date(&mut self, date: NaiveDate) {
        if date == self.date {
            return;
        }
        if self.edit_id.is_some() {
            self.cancel_edit();
        }
        self.date = date;
        self.cursor = 0;
        self.resume_edit();
    }

    pub fn shift_date(&mut self, days: i64) {
        let next = if days >= 0 {
            self.date.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.date.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = next {
            self.select_date(date);
        }
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.clamp_cursor();
    }

    /// Flip dark/light and remember the choice in config.toml
    pub fn toggle_theme(&mut self) {
        self.theme_mode = self.theme_mode.toggled();
        self.planner.config.ui.theme = self.theme_mode;
        self.theme = Theme::for_mode(self.theme_mode, &self.planner.config.ui.colors);
        if let Err(e) = config_io::save_theme(&self.planner.data_dir, self.theme_mode) {
            log::warn!("could not save theme: {}", e);
            self.set_error(format!("\u{274C} {}", e));
        }
    }

    // -----------------------------------------------------------------------
    // Reminders
    // -----------------------------------------------------------------------

    /// One reminder tick against the current store. Fired reminders are
    /// saved and shown as a toast. Returns how many fired.
    pub fn scan_reminders<N: Notifier>(
        &mut self,
        scanner: &mut ReminderScanner<N>,
        now: NaiveDateTime,
    ) -> usize {
        self.reload_if_changed();
        if due_reminders(&self.planner.store, now).is_empty() {
            return 0;
        }
        let fired = self
            .mutate(|store| Ok(scanner.tick(store, now)))
            .unwrap_or_default();
        if let Some(last) = fired.last() {
            let more = if fired.len() > 1 {
                format!(" (+{} more)", fired.len() - 1)
            } else {
                String::new()
            };
            self.set_status(format!(
                "\u{1F514} {} {}{}",
                last.time, last.text, more
            ));
        }
        fired.len()
    }
}

fn step(pos: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let target = pos as i64 + delta as i64;
    target.clamp(0, len as i64 - 1) as usize
}

/// Send log output to `<data_dir>/daily-todo.log` while the terminal is ours
fn init_file_logger(data_dir: &Path) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("daily-todo.log"))
    else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

/// Run the TUI application
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    init_file_logger(data_dir);

    let planner = store_io::load_planner(data_dir)?;
    let desktop = planner.config.reminders.desktop;
    let mut app = App::new(planner, Local::now().date_naive());

    let mut scanner = ReminderScanner::new(DesktopNotifier::new(desktop));
    scanner.request_permission();

    let watcher = match StoreWatcher::start(data_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            log::warn!("file watcher unavailable: {}", e);
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &mut scanner, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<N: Notifier>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    scanner: &mut ReminderScanner<N>,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reminder_gate = MinuteGate::default();
    loop {
        app.expire_status(Instant::now());

        if watcher.is_some_and(|w| w.poll()) {
            app.reload_if_changed();
        }

        // Checked every pass; the gate lets each wall-clock minute through once
        let clock_now = SystemClock.now();
        if reminder_gate.should_scan(clock_now) {
            app.scan_reminders(scanner, clock_now);
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
