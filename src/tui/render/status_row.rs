use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, TextField, View};
use crate::util::unicode;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint): (Vec<Span>, &str) = match app.mode {
        Mode::Search => {
            let spans = prompt(frame, app, area, "/", &app.search);
            (spans, "Enter keep  Esc clear")
        }
        Mode::GoTo => {
            let spans = prompt(frame, app, area, "go to: ", &app.goto_field);
            (spans, "Enter go  Esc cancel")
        }
        Mode::Edit => (Vec::new(), "Enter save  Esc cancel"),
        Mode::Add => (Vec::new(), ""),
        Mode::Navigate => {
            let mut spans = Vec::new();
            // A kept search stays visible, dimmed
            if !app.search.text.is_empty() && app.view == View::Day {
                spans.push(Span::styled(
                    format!("/{}", app.search.text),
                    Style::default().fg(app.theme.dim).bg(bg),
                ));
            }
            let hint = match app.view {
                View::Day => "n add  \u{2423} toggle  e edit  d delete  / search  ? help",
                View::History => "Enter open day  p back  ? help",
            };
            (spans, hint)
        }
    };

    // A toast replaces the left side while it lasts
    if let Some(ref status) = app.status
        && !matches!(app.mode, Mode::Search | Mode::GoTo)
    {
        let color = if status.is_error {
            app.theme.red
        } else {
            app.theme.green
        };
        spans = vec![Span::styled(
            format!(" {}", status.text),
            Style::default().fg(color).bg(bg),
        )];
    }

    let content_width: usize = spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum();
    let hint_width = unicode::display_width(hint);
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width - 1;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// A prompt with its text input, placing the terminal cursor in it
fn prompt<'a>(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    label: &'static str,
    field: &TextField,
) -> Vec<Span<'a>> {
    let bg = app.theme.background;
    let x = area.x as usize + unicode::display_width(label) + field.cursor_col();
    if x < (area.x + area.width) as usize {
        frame.set_cursor_position(Position::new(x as u16, area.y));
    }
    vec![
        Span::styled(label, Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            field.text.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_hints() {
        let app = app_with(&[]);
        let output = render(&app);
        assert!(output.contains("n add"));
        assert!(output.ends_with("? help"));
    }

    #[test]
    fn search_prompt() {
        let mut app = app_with(&[]);
        app.mode = Mode::Search;
        app.search = TextField::with_text("milk");
        let output = render(&app);
        assert!(output.starts_with("/milk"));
        assert!(output.contains("Esc clear"));
    }

    #[test]
    fn error_toast() {
        let mut app = app_with(&[]);
        app.set_error(crate::tui::app::MSG_EMPTY);
        let output = render(&app);
        assert!(output.contains("Please enter a task."));
    }

    #[test]
    fn kept_search_shows_dimmed() {
        let mut app = app_with(&[]);
        app.search = TextField::with_text("dog");
        assert!(render(&app).starts_with("/dog"));
    }
}
