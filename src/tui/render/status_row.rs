use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::spans_width;

/// Render the status row: last message (or totals) left, help hint right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = match &app.status {
        Some(msg) => {
            let fg = if msg.is_error {
                app.theme.red
            } else {
                app.theme.text
            };
            vec![Span::styled(format!(" {}", msg.text), Style::default().fg(fg).bg(bg))]
        }
        None => {
            let tasks = app.controller.list().tasks();
            let done = tasks.iter().filter(|t| t.completed).count();
            let noun = if tasks.len() == 1 { "task" } else { "tasks" };
            vec![Span::styled(
                format!(" {} {}, {} done", tasks.len(), noun, done),
                Style::default().fg(app.theme.dim).bg(bg),
            )]
        }
    };

    if app.show_key_hints {
        let hint = "? help ";
        let used = spans_width(&spans);
        if used + hint.len() < width {
            spans.push(Span::styled(
                " ".repeat(width - used - hint.len()),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
}
