use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::model::filter::Filter;
use crate::ops::task_ops::{RowAction, TaskRow};
use crate::tui::app::{App, Mode};

use super::spans_width;

/// Render the display list, keeping the cursor row in view
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let height = area.height as usize;
    let width = area.width as usize;

    if app.controller.rows().is_empty() {
        let msg = match app.controller.filter() {
            Filter::All => " No tasks yet. Press a to add one.",
            Filter::Complete => " Nothing completed yet",
            Filter::Incomplete => " Nothing left to do",
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    app.clamp_scroll(height);
    let cursor = app.cursor();
    let show_hints = app.show_key_hints && app.mode == Mode::Navigate;

    let lines: Vec<Line> = app
        .controller
        .rows()
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .map(|(i, row)| row_line(app, row, cursor == Some(i), show_hints, width))
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn row_line<'a>(
    app: &App,
    row: &TaskRow,
    is_cursor: bool,
    show_hints: bool,
    width: usize,
) -> Line<'a> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let marker = if is_cursor { "\u{25B8}" } else { " " };
    let check = if row.completed { 'x' } else { ' ' };

    let mut spans: Vec<Span> = vec![
        Span::styled(
            format!(" {} ", marker),
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
        Span::styled(
            format!("[{}] ", check),
            Style::default()
                .fg(if row.completed {
                    app.theme.green
                } else {
                    app.theme.text
                })
                .bg(bg),
        ),
    ];

    let hints = if is_cursor && show_hints {
        hint_text(row)
    } else {
        String::new()
    };
    let hint_width = if hints.is_empty() {
        0
    } else {
        hints.width() + 2
    };

    let mut label_style = Style::default().fg(app.theme.task_color(row.completed)).bg(bg);
    if row.completed {
        label_style = label_style.add_modifier(Modifier::CROSSED_OUT);
    } else if is_cursor {
        label_style = label_style
            .fg(app.theme.text_bright)
            .add_modifier(Modifier::BOLD);
    }
    let budget = width.saturating_sub(spans_width(&spans) + hint_width);
    spans.push(Span::styled(truncate_to_width(&row.label, budget), label_style));

    if is_cursor {
        let used = spans_width(&spans);
        if !hints.is_empty() && used + hint_width <= width {
            spans.push(Span::styled(
                " ".repeat(width - used - hints.width()),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(hints, Style::default().fg(app.theme.dim).bg(bg)));
        } else if used < width {
            spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        }
    }

    Line::from(spans)
}

/// "Space Done  d Delete  e Edit" for the row's actions
fn hint_text(row: &TaskRow) -> String {
    row.actions
        .iter()
        .map(|action| {
            let key = match action {
                RowAction::Toggle => "Space",
                RowAction::Delete => "d",
                RowAction::Edit => "e",
            };
            format!("{} {}", key, action.label(row.completed))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Cut `s` to at most `max` cells, ending in `…` when shortened
fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let w = g.width();
        if used + w > max - 1 {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}
