use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::parse_date_key;
use crate::tui::app::{AddField, App, Mode, TextField};

/// Apply a line-editing key to a text field. Returns false if the key is
/// not an editing key (Enter, Esc, Tab and friends are left to the caller).
pub(super) fn edit_text_field(field: &mut TextField, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('a') if ctrl => field.home(),
        KeyCode::Char('e') if ctrl => field.end(),
        KeyCode::Char('w') if ctrl => field.delete_word(),
        KeyCode::Char('u') if ctrl => {
            field.text.drain(..field.cursor);
            field.cursor = 0;
        }
        KeyCode::Char(_) if ctrl => return false,
        KeyCode::Char(c) => field.insert(c),
        KeyCode::Backspace if alt => field.delete_word(),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left if alt || ctrl => field.word_left(),
        KeyCode::Right if alt || ctrl => field.word_right(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        _ => return false,
    }
    true
}

/// Add form: Tab switches between text and time, Enter submits
pub(super) fn handle_add(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.add_form.reset();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => app.submit_add(),
        KeyCode::Tab | KeyCode::BackTab => app.add_form.switch_field(),
        // The time input only takes HH:MM characters
        KeyCode::Char(c)
            if app.add_form.field == AddField::Time
                && !key.modifiers.contains(KeyModifiers::CONTROL)
                && !(c.is_ascii_digit() || c == ':') => {}
        _ => {
            edit_text_field(app.add_form.active_mut(), key);
        }
    }
}

/// Inline edit of the task under the cursor
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.confirm_edit(),
        KeyCode::Esc => app.cancel_edit(),
        _ => {
            edit_text_field(&mut app.edit_field, key);
        }
    }
}

/// Go-to-date prompt
pub(super) fn handle_goto(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.goto_field.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => match parse_date_key(&app.goto_field.text) {
            Some(date) => {
                app.goto_field.clear();
                app.mode = Mode::Navigate;
                app.select_date(date);
            }
            None => {
                let text = app.goto_field.text.clone();
                app.set_error(format!("\u{274C} Not a date: {} (use YYYY-MM-DD)", text));
            }
        },
        _ => {
            edit_text_field(&mut app.goto_field, key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::{app_in, day, key, press};
    use tempfile::TempDir;

    #[test]
    fn add_form_flow() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(tmp.path(), &[]);
        press(&mut app, "nBuy milk");
        handle_key(&mut app, key(KeyCode::Tab));
        press(&mut app, "9:0x5");
        assert_eq!(app.add_form.time.text, "9:05");
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Navigate);
        let tasks = app.store().tasks_for(day());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Buy milk");
        assert_eq!(tasks[0].time, "09:05");
    }

    #[test]
    fn bad_time_keeps_form_open() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(tmp.path(), &[]);
        press(&mut app, "nx");
        handle_key(&mut app, key(KeyCode::Tab));
        press(&mut app, "99:99");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Add);
        assert!(app.status.as_ref().unwrap().is_error);
        assert!(app.store().tasks_for(day()).is_empty());
    }

    #[test]
    fn esc_cancels_inline_edit() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(tmp.path(), &[("keep me", "", false)]);
        press(&mut app, "e");
        assert_eq!(app.mode, Mode::Edit);
        handle_key(&mut app, key(KeyCode::Backspace));
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        let task = &app.store().tasks_for(day())[0];
        assert_eq!(task.text, "keep me");
        assert!(!task.editing);
    }

    #[test]
    fn goto_date() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(tmp.path(), &[]);
        press(&mut app, "g");
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        press(&mut app, "2023-05-06");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.date, parse_date_key("2023-05-06").unwrap());

        press(&mut app, "g");
        press(&mut app, "x");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::GoTo);
        assert!(app.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn ctrl_keys_do_not_insert() {
        let mut field = TextField::with_text("ab");
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert!(!edit_text_field(&mut field, ctrl_k));
        assert_eq!(field.text, "ab");
    }
}
