use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::date_key;
use crate::ops::view;
use crate::tui::app::App;
use crate::util::unicode;

use super::scroll_for;

/// Render past records: every date with tasks, newest first, each with its
/// full task list
pub fn render_history_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let days = view::history(app.store());

    if days.is_empty() {
        let empty = Paragraph::new(" No past records yet")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let cursor = app.history_cursor.min(days.len() - 1);
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;

    for (idx, day) in days.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        let is_cursor = idx == cursor;
        if is_cursor {
            cursor_line = lines.len();
        }
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };

        let mut spans = vec![
            if is_cursor {
                Span::styled(
                    "\u{258E}",
                    Style::default().fg(app.theme.highlight).bg(row_bg),
                )
            } else {
                Span::styled(" ", Style::default().bg(row_bg))
            },
            Span::styled(
                format!("{} {}", date_key(day.date), day.date.format("%a")),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}/{} done", day.completed_count(), day.tasks.len()),
                Style::default().fg(app.theme.dim).bg(row_bg),
            ),
        ];
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

        for task in day.tasks {
            let time = if task.has_time() {
                format!("{} ", task.time)
            } else {
                String::new()
            };
            let text_style = if task.completed {
                Style::default()
                    .fg(app.theme.dim)
                    .bg(bg)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(app.theme.text).bg(bg)
            };
            let prefix = format!("   {} {}", task.checkbox(), time);
            let available = width.saturating_sub(unicode::display_width(&prefix) + 1);
            lines.push(Line::from(vec![
                Span::styled(prefix, Style::default().fg(app.theme.dim).bg(bg)),
                Span::styled(unicode::truncate_to_width(&task.text, available), text_style),
            ]));
        }
    }

    let height = area.height as usize;
    let scroll = scroll_for(cursor_line, height);
    let visible: Vec<Line> = lines.into_iter().skip(scroll).take(height).collect();
    frame.render_widget(Paragraph::new(visible).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_date_key;
    use crate::ops::task_ops;
    use crate::tui::app::View;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn empty_history() {
        let mut app = app_with(&[]);
        app.view = View::History;
        let output = render_to_string(TERM_W, 10, |frame, area| {
            render_history_view(frame, &app, area);
        });
        assert!(output.contains("No past records yet"));
    }

    #[test]
    fn newest_first_with_tasks() {
        let mut app = app_with(&[("older task", "08:30", true)]);
        let later = parse_date_key("2024-01-05").unwrap();
        task_ops::add_task_at(&mut app.planner.store, later, "newer task", "", 5000).unwrap();
        // Empty dates are not past records
        app.planner.store.day_entry(parse_date_key("2024-01-09").unwrap());
        app.view = View::History;

        let output = render_to_string(TERM_W, 10, |frame, area| {
            render_history_view(frame, &app, area);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("2024-01-05 Fri  0/1 done"));
        assert!(lines[1].contains("[ ] newer task"));
        assert_eq!(lines[2], "");
        assert!(lines[3].contains("2024-01-01 Mon  1/1 done"));
        assert!(lines[4].contains("[x] 08:30 older task"));
        assert!(!output.contains("2024-01-09"));
    }
}
