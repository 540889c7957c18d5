use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::date_key;
use crate::ops::view::{self, StatusFilter};
use crate::tui::app::{App, Mode, TextField, View};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts everything; ? or Esc closes it
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    // Quit: Ctrl+C / Ctrl+Q from anywhere in navigate mode
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            app.should_quit = true;
        }
        return;
    }

    // Keys shared by both views
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Char('D') => {
            app.toggle_theme();
            return;
        }
        KeyCode::Char('p') => {
            app.view = match app.view {
                View::Day => View::History,
                View::History => View::Day,
            };
            app.clamp_cursor();
            return;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_cursor(1);
            return;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_cursor(-1);
            return;
        }
        _ => {}
    }

    match app.view {
        View::Day => handle_day_key(app, key),
        View::History => handle_history_key(app, key),
    }
}

fn handle_day_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Add form
        KeyCode::Char('n') | KeyCode::Char('o') | KeyCode::Char('a') => {
            app.add_form.reset();
            app.mode = Mode::Add;
        }

        // Task actions on the cursor row
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_cursor(),
        KeyCode::Char('e') | KeyCode::Enter => app.begin_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_cursor(),

        // Filter buttons
        KeyCode::Char('f') => {
            let next = app.filter.next();
            app.set_filter(next);
        }
        KeyCode::Char('1') => app.set_filter(StatusFilter::All),
        KeyCode::Char('2') => app.set_filter(StatusFilter::Active),
        KeyCode::Char('3') => app.set_filter(StatusFilter::Completed),

        // Search box
        KeyCode::Char('/') => {
            app.search.end();
            app.mode = Mode::Search;
        }
        KeyCode::Esc => {
            if !app.search.text.is_empty() {
                app.search.clear();
                app.clamp_cursor();
            }
        }

        // Date picker
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('[') => app.shift_date(-1),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(']') => app.shift_date(1),
        KeyCode::Char('t') => app.select_date(chrono::Local::now().date_naive()),
        KeyCode::Char('g') => {
            app.goto_field = TextField::with_text(&date_key(app.date));
            app.mode = Mode::GoTo;
        }
        KeyCode::Char('G') => {
            let len = app.visible_ids().len();
            app.cursor = len.saturating_sub(1);
        }

        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Open the selected day
        KeyCode::Enter => {
            let date = view::history(app.store())
                .get(app.history_cursor)
                .map(|d| d.date);
            if let Some(date) = date {
                app.select_date(date);
                app.view = View::Day;
            }
        }
        KeyCode::Esc => app.view = View::Day,
        _ => {}
    }
}
