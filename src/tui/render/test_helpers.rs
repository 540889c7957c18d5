use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store_io;
use crate::model::{Config, Planner, TodoStore};
use crate::ops::task_ops;
use crate::tui::app::App;
use crate::tui::input::handle_key;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// The day every test app opens on
pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// A store with `(text, time, completed)` tasks on `day()`, ids 1001, 1002, ...
pub fn store_with(tasks: &[(&str, &str, bool)]) -> TodoStore {
    let mut store = TodoStore::new();
    for (i, (text, time, completed)) in tasks.iter().enumerate() {
        let id = task_ops::add_task_at(&mut store, day(), text, time, 1001 + i as i64).unwrap();
        if *completed {
            task_ops::toggle_complete(&mut store, day(), id);
        }
    }
    store
}

/// An App over an in-memory store, for render tests. Nothing is written.
pub fn app_with(tasks: &[(&str, &str, bool)]) -> App {
    let planner = Planner {
        data_dir: PathBuf::from("/nonexistent/daily-todo-test"),
        config: Config::default(),
        store: store_with(tasks),
    };
    App::new(planner, day())
}

/// An App whose store is saved in `dir`, for tests that mutate.
pub fn app_in(dir: &Path, tasks: &[(&str, &str, bool)]) -> App {
    store_io::save_store(dir, &store_with(tasks)).unwrap();
    let planner = store_io::load_planner(dir).unwrap();
    App::new(planner, day())
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Type each character of `keys` as a separate key press
pub fn press(app: &mut App, keys: &str) {
    for c in keys.chars() {
        let modifiers = if c.is_ascii_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        handle_key(app, KeyEvent::new(KeyCode::Char(c), modifiers));
    }
}
