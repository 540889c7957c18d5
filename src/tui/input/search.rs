use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

use super::edit_text_field;

/// Search box. The list filters live as the query changes; Enter keeps the
/// query, Esc clears it.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
        }
        KeyCode::Esc => {
            app.search.clear();
            app.mode = Mode::Navigate;
            app.clamp_cursor();
        }
        _ => {
            if edit_text_field(&mut app.search, key) {
                app.cursor = 0;
            }
        }
    }
}
