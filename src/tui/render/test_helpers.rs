use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::model::config::Config;
use crate::model::filter::Filter;
use crate::model::task::TaskId;
use crate::ops::controller::{Controller, DEFAULT_KEY};
use crate::tui::app::{App, BoxedStore};

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an in-memory store holding `(text, completed)` tasks,
/// with ids `1..=n` and the cursor on the first task.
pub fn app_with_tasks(tasks: &[(&str, bool)]) -> App {
    let store: BoxedStore = Box::new(MemoryStore::new());
    let mut controller = Controller::load(store, DEFAULT_KEY, Filter::All).unwrap();
    for (text, completed) in tasks {
        let id = controller.add(text).unwrap().unwrap();
        if *completed {
            controller.toggle_completed(id).unwrap();
        }
    }
    let mut app = App::new(controller, &Config::default());
    if !tasks.is_empty() {
        app.selected = Some(TaskId(1));
    }
    app
}
