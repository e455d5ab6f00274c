use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("\u{2191}\u{2193}/jk", "Move cursor"),
            ("g/G", "First / last task"),
        ],
    ),
    (
        "Tasks",
        &[
            ("a/i", "Add a task"),
            ("Space/x", "Mark done / undo"),
            ("e", "Edit text"),
            ("d", "Delete"),
        ],
    ),
    (
        "Filter",
        &[
            ("f/Tab", "Next filter"),
            ("1 2 3", "All / Complete / Incomplete"),
        ],
    ),
    (
        "Input line",
        &[
            ("Enter", "Save"),
            ("Esc", "Cancel"),
            ("Ctrl-W", "Delete word"),
            ("Ctrl-U", "Clear"),
        ],
    ),
    ("", &[("?", "Toggle this help"), ("q/Esc", "Quit")]),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];

    for (section, bindings) in BINDINGS {
        if !section.is_empty() {
            lines.push(Line::from(Span::styled(format!(" {}", section), header_style)));
        }
        for (key, desc) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<12}", key), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

/// A rectangle `percent_x` by `percent_y` of `area`, centered
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(rows[1])[1]
}
