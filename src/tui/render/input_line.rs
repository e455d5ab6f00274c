use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, Mode};

use super::spans_width;

/// Render the input line: add/edit field, delete confirmation, or key hints
pub fn render_input_line(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (prefix, prefix_style) = match app.mode {
        Mode::Add => (
            " + ".to_string(),
            Style::default().fg(app.theme.green).bg(bg).add_modifier(Modifier::BOLD),
        ),
        Mode::Edit(id) => (
            format!(" edit #{}: ", id),
            Style::default().fg(app.theme.highlight).bg(bg).add_modifier(Modifier::BOLD),
        ),
        Mode::ConfirmDelete(id) => {
            let text = app
                .controller
                .task(id)
                .map(|t| t.text.as_str())
                .unwrap_or_default();
            let line = Line::from(vec![
                Span::styled(
                    format!(" Delete \"{}\"? ", text),
                    Style::default().fg(app.theme.red).bg(bg),
                ),
                Span::styled("y/n", Style::default().fg(app.theme.text_bright).bg(bg)),
            ]);
            frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
            return;
        }
        Mode::Navigate => {
            if app.show_key_hints {
                let hints = " a add  e edit  d delete  f filter  ? help";
                let para = Paragraph::new(hints)
                    .style(Style::default().fg(app.theme.dim).bg(bg));
                frame.render_widget(para, area);
            }
            return;
        }
    };

    let mut spans = vec![Span::styled(prefix, prefix_style)];
    let field_width = width.saturating_sub(spans_width(&spans));
    let (shown, cursor_col) = app.input.visible(field_width);
    render_edit_inline(&mut spans, app, shown, cursor_col);

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
}

/// Render the visible part of the buffer with the character under the
/// cursor highlighted (a highlighted space at the end of the text)
fn render_edit_inline(spans: &mut Vec<Span<'static>>, app: &App, shown: &str, cursor_col: usize) {
    let style = Style::default().fg(app.theme.text_bright).bg(app.theme.background);
    let cursor_style = Style::default()
        .fg(app.theme.background)
        .bg(app.theme.text_bright);

    let mut split = shown.len();
    let mut col = 0;
    for (i, g) in shown.grapheme_indices(true) {
        if col >= cursor_col {
            split = i;
            break;
        }
        col += g.width();
    }

    let (before, rest) = shown.split_at(split);
    if !before.is_empty() {
        spans.push(Span::styled(before.to_string(), style));
    }
    match rest.graphemes(true).next() {
        Some(g) => {
            spans.push(Span::styled(g.to_string(), cursor_style));
            let after = &rest[g.len()..];
            if !after.is_empty() {
                spans.push(Span::styled(after.to_string(), style));
            }
        }
        None => spans.push(Span::styled(" ", cursor_style)),
    }
}
