use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Task;
use crate::ops::view;
use crate::tui::app::{AddField, App, Mode, TextField};
use crate::util::unicode;

use super::{match_style, push_highlighted_spans, scroll_for};

/// Rows taken by the add form when it is open
const ADD_FORM_HEIGHT: u16 = 3;

/// Render the selected day: add form (when open) above the filtered list
pub fn render_day_view(frame: &mut Frame, app: &App, area: Rect) {
    let mut list_area = area;
    if app.mode == Mode::Add && area.height > ADD_FORM_HEIGHT {
        let form_area = Rect {
            height: ADD_FORM_HEIGHT,
            ..area
        };
        render_add_form(frame, app, form_area);
        list_area = Rect {
            y: area.y + ADD_FORM_HEIGHT,
            height: area.height - ADD_FORM_HEIGHT,
            ..area
        };
    }
    render_task_list(frame, app, list_area);
}

fn render_add_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let form = &app.add_form;

    let field_line = |name: &'static str, field: &TextField, placeholder: &'static str, active: bool| {
        let name_style = if active {
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            label
        };
        let value = if field.text.is_empty() {
            Span::styled(placeholder, label)
        } else {
            Span::styled(
                field.text.clone(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            )
        };
        Line::from(vec![Span::styled(name, name_style), value])
    };

    let lines = vec![
        field_line(" Task: ", &form.text, "What needs doing?", form.field == AddField::Text),
        field_line(" Time: ", &form.time, "HH:MM (optional)", form.field == AddField::Time),
        Line::from(Span::styled(
            " Enter add  Tab switch field  Esc cancel",
            label,
        )),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);

    // Terminal cursor on the focused input
    let (row, field) = match form.field {
        AddField::Text => (0, &form.text),
        AddField::Time => (1, &form.time),
    };
    let x = area.x + 7 + field.cursor_col() as u16;
    if x < area.x + area.width {
        frame.set_cursor_position(Position::new(x, area.y + row));
    }
}

fn render_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let query = app.query();
    let tasks = view::visible_tasks(app.store(), &query);

    if tasks.is_empty() {
        let msg = if app.store().tasks_for(app.date).is_empty() {
            " No tasks for this day. Press n to add one."
        } else {
            " No tasks match the current filter."
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let search_re = app.search_re();
    let cursor = app.cursor.min(tasks.len() - 1);
    let height = area.height as usize;
    let scroll = scroll_for(cursor, height);
    let width = area.width as usize;

    let mut lines: Vec<Line> = Vec::new();
    for (idx, task) in tasks.iter().enumerate().skip(scroll).take(height) {
        let is_cursor = idx == cursor && app.mode != Mode::Add;
        let is_editing = app.mode == Mode::Edit && app.edit_id == Some(task.id);
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };

        let mut spans = task_prefix(app, task, is_cursor);

        if is_editing {
            let prefix_width: usize = spans
                .iter()
                .map(|s| unicode::display_width(&s.content))
                .sum();
            spans.push(Span::styled(
                app.edit_field.text.clone(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::UNDERLINED),
            ));
            let x = area.x as usize + prefix_width + app.edit_field.cursor_col();
            if x < (area.x as usize + width) {
                let y = area.y + (idx - scroll) as u16;
                frame.set_cursor_position(Position::new(x as u16, y));
            }
        } else {
            let mut text_style = Style::default().fg(app.theme.text_bright).bg(row_bg);
            if task.completed {
                text_style = Style::default()
                    .fg(app.theme.dim)
                    .bg(row_bg)
                    .add_modifier(Modifier::CROSSED_OUT);
            } else if is_cursor {
                text_style = text_style.add_modifier(Modifier::BOLD);
            }
            let prefix_width: usize = spans
                .iter()
                .map(|s| unicode::display_width(&s.content))
                .sum();
            let available = width.saturating_sub(prefix_width + 1);
            let display = unicode::truncate_to_width(&task.text, available);
            push_highlighted_spans(
                &mut spans,
                &display,
                text_style,
                match_style(&app.theme),
                search_re.as_ref(),
            );
        }

        // Fill the rest of the row so the selection bar spans the width
        let used: usize = spans
            .iter()
            .map(|s| unicode::display_width(&s.content))
            .sum();
        if used < width {
            spans.push(Span::styled(
                " ".repeat(width - used),
                Style::default().bg(row_bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Selection bar, checkbox and reminder time
fn task_prefix<'a>(app: &App, task: &Task, is_cursor: bool) -> Vec<Span<'a>> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let mut spans = Vec::new();

    if is_cursor {
        spans.push(Span::styled(
            "\u{258E}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    } else {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    let box_color = if task.completed {
        app.theme.green
    } else {
        app.theme.text
    };
    spans.push(Span::styled(
        format!("{} ", task.checkbox()),
        Style::default().fg(box_color).bg(bg),
    ));

    if task.has_time() {
        // A delivered reminder fades; a pending one stands out
        let time_color = if task.notified {
            app.theme.dim
        } else {
            app.theme.cyan
        };
        spans.push(Span::styled(
            format!("{} ", task.time),
            Style::default().fg(time_color).bg(bg),
        ));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::view::StatusFilter;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 10, |frame, area| render_day_view(frame, app, area))
    }

    #[test]
    fn empty_day() {
        let app = app_with(&[]);
        assert!(render(&app).contains("No tasks for this day"));
    }

    #[test]
    fn filtered_out() {
        let mut app = app_with(&[("done already", "", true)]);
        app.filter = StatusFilter::Active;
        assert!(render(&app).contains("No tasks match the current filter"));
    }

    #[test]
    fn rows_show_checkbox_time_and_text() {
        let app = app_with(&[("Buy milk", "09:00", false), ("Walk dog", "", true)]);
        let output = render(&app);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("[ ] 09:00 Buy milk"));
        assert!(lines[1].contains("[x] Walk dog"));
        assert!(lines[0].starts_with('\u{258E}'));
    }

    #[test]
    fn add_form_sits_above_list() {
        let mut app = app_with(&[("existing", "", false)]);
        app.mode = Mode::Add;
        app.add_form.text = TextField::with_text("new thing");
        let output = render(&app);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], " Task: new thing");
        assert!(lines[1].contains("HH:MM (optional)"));
        assert!(lines[3].contains("existing"));
    }

    #[test]
    fn inline_edit_shows_buffer() {
        let mut app = app_with(&[("old text", "", false)]);
        app.mode = Mode::Edit;
        app.edit_id = app.cursor_task_id();
        app.edit_field = TextField::with_text("new text");
        let output = render(&app);
        assert!(output.contains("new text"));
        assert!(!output.contains("old text"));
    }

    #[test]
    fn long_text_is_truncated() {
        let long = "x".repeat(200);
        let app = app_with(&[(long.as_str(), "", false)]);
        let output = render(&app);
        assert!(output.lines().next().unwrap().ends_with('\u{2026}'));
    }

    #[test]
    fn cursor_row_scrolls_into_view() {
        let names: Vec<String> = (0..20).map(|i| format!("task {}", i)).collect();
        let tasks: Vec<(&str, &str, bool)> =
            names.iter().map(|n| (n.as_str(), "", false)).collect();
        let mut app = app_with(&tasks);
        app.cursor = 15;
        let output = render(&app);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("task 6"));
        assert!(lines[9].contains("task 15"));
    }
}
