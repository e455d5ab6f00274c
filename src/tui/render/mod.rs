pub mod filter_bar;
pub mod help_overlay;
pub mod input_line;
pub mod status_row;
pub mod task_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function: filter bar, task list, input line, status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // filter tabs + separator
            Constraint::Min(1),    // task list
            Constraint::Length(1), // input line
            Constraint::Length(1), // status row
        ])
        .split(area);

    filter_bar::render_filter_bar(frame, app, chunks[0]);
    task_list::render_task_list(frame, app, chunks[1]);
    input_line::render_input_line(frame, app, chunks[2]);
    status_row::render_status_row(frame, app, chunks[3]);

    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
}

/// Sum of the display widths of `spans`
pub(super) fn spans_width(spans: &[ratatui::text::Span]) -> usize {
    spans.iter().map(|s| s.width()).sum()
}
