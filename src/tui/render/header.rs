use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::date_key;
use crate::ops::view::{self, StatusFilter};
use crate::tui::app::{App, View};
use crate::util::unicode;

/// Render the header: title, date picker, filter buttons and a day summary,
/// with a separator line below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_title_row(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render the header row and return the column of each `│` divider.
fn render_title_row(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));
    let width_of = |spans: &[Span]| -> usize {
        spans.iter().map(|s| unicode::display_width(&s.content)).sum()
    };

    spans.push(Span::styled(" ", Style::default().bg(bg)));
    spans.push(Span::styled(
        "\u{2713}",
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    spans.push(Span::styled(
        " daily-todo ",
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    sep_cols.push(width_of(&spans));
    spans.push(sep.clone());

    match app.view {
        View::Day => {
            // Date picker
            let is_today = app.date == Local::now().date_naive();
            spans.push(Span::styled(
                " \u{25C0} ",
                Style::default().fg(app.theme.dim).bg(bg),
            ));
            spans.push(Span::styled(
                format!("{} {}", date_key(app.date), app.date.format("%a")),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ));
            if is_today {
                spans.push(Span::styled(
                    " today",
                    Style::default().fg(app.theme.cyan).bg(bg),
                ));
            }
            spans.push(Span::styled(
                " \u{25B6} ",
                Style::default().fg(app.theme.dim).bg(bg),
            ));
            sep_cols.push(width_of(&spans));
            spans.push(sep.clone());

            // Filter buttons
            for filter in [
                StatusFilter::All,
                StatusFilter::Active,
                StatusFilter::Completed,
            ] {
                spans.push(Span::styled(
                    format!(" {} ", filter_label(filter)),
                    button_style(app, filter == app.filter),
                ));
            }
            sep_cols.push(width_of(&spans));
            spans.push(sep.clone());

            // Summary for the whole day, regardless of filter
            let tasks = app.store().tasks_for(app.date);
            let done = tasks.iter().filter(|t| t.completed).count();
            spans.push(Span::styled(
                format!(" {}/{} done", done, tasks.len()),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        View::History => {
            let days = view::history(app.store()).len();
            spans.push(Span::styled(
                " Past records ",
                button_style(app, true),
            ));
            sep_cols.push(width_of(&spans));
            spans.push(sep.clone());
            spans.push(Span::styled(
                format!(" {} {}", days, if days == 1 { "date" } else { "dates" }),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let mut line = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

fn filter_label(filter: StatusFilter) -> &'static str {
    match filter {
        StatusFilter::All => "All",
        StatusFilter::Active => "Active",
        StatusFilter::Completed => "Completed",
    }
}

/// Style for a button: highlighted if selected, normal otherwise
fn button_style(app: &App, selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
