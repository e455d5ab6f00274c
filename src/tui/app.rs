use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::store::{FileStore, KeyValueStore, StoreError};
use crate::io::watcher::StoreWatcher;
use crate::model::config::Config;
use crate::model::task::TaskId;
use crate::ops::controller::{Controller, ControllerError, TextPrompt};

use super::input;
use super::line_input::LineInput;
use super::render;
use super::theme::Theme;

/// Smallest terminal that fits filter bar, list, input line and status row
pub const MIN_WIDTH: u16 = 24;
pub const MIN_HEIGHT: u16 = 5;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("terminal setup failed: {0}")]
    Terminal(#[from] io::Error),
    #[error("terminal is {width}x{height}, need at least {}x{}", MIN_WIDTH, MIN_HEIGHT)]
    TerminalTooSmall { width: u16, height: u16 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the input line
    Add,
    /// Editing the text of a task in the input line
    Edit(TaskId),
    /// Waiting for y/n before deleting
    ConfirmDelete(TaskId),
}

/// One-line feedback shown in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// The in-terminal edit field acting as the controller's text prompt.
/// Enter hands the typed text over; Esc never reaches the controller.
struct SubmittedEdit<'a>(&'a mut LineInput);

impl TextPrompt for SubmittedEdit<'_> {
    fn prompt(&mut self, _message: &str, _initial: &str) -> Option<String> {
        Some(self.0.take())
    }
}

pub type BoxedStore = Box<dyn KeyValueStore>;

/// Main application state
pub struct App {
    pub controller: Controller<BoxedStore>,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Task under the cursor. Tracked by id so filtering and deletes never
    /// move it onto a different task.
    pub selected: Option<TaskId>,
    /// First visible row of the task list
    pub scroll_offset: usize,
    /// Input line (add or edit)
    pub input: LineInput,
    pub show_help: bool,
    pub show_key_hints: bool,
    pub confirm_delete: bool,
    pub status: Option<StatusMessage>,
}

impl App {
    pub fn new(controller: Controller<BoxedStore>, config: &Config) -> Self {
        let selected = controller.rows().first().map(|r| r.id);
        App {
            controller,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            selected,
            scroll_offset: 0,
            input: LineInput::new(),
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            confirm_delete: config.ui.confirm_delete,
            status: None,
        }
    }

    /// Row index of the selected task in the current display list
    pub fn cursor(&self) -> Option<usize> {
        let id = self.selected?;
        self.controller.rows().iter().position(|r| r.id == id)
    }

    /// Select the row at `index`, clamped to the list
    pub fn select_index(&mut self, index: usize) {
        let rows = self.controller.rows();
        self.selected = if rows.is_empty() {
            None
        } else {
            Some(rows[index.min(rows.len() - 1)].id)
        };
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let current = self.cursor().unwrap_or(0);
        let next = current.saturating_add_signed(delta);
        self.select_index(next);
    }

    /// After the display list changed: keep the selection if it is still
    /// visible, otherwise fall back to the row that took its place.
    pub fn reconcile_cursor(&mut self, previous_index: usize) {
        if self.cursor().is_none() {
            self.select_index(previous_index);
        }
    }

    /// Keep the cursor row inside a viewport of `height` rows
    pub fn clamp_scroll(&mut self, height: usize) {
        let Some(cursor) = self.cursor() else {
            self.scroll_offset = 0;
            return;
        };
        if height == 0 {
            return;
        }
        if cursor < self.scroll_offset {
            self.scroll_offset = cursor;
        } else if cursor >= self.scroll_offset + height {
            self.scroll_offset = cursor + 1 - height;
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn error(&mut self, err: impl std::fmt::Display) {
        self.status = Some(StatusMessage {
            text: err.to_string(),
            is_error: true,
        });
    }

    /// Report the outcome of a controller call in the status row
    pub fn report<T>(&mut self, result: Result<T, ControllerError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.error(e);
                None
            }
        }
    }

    /// Commit the input line as the new text of `id`
    pub fn commit_edit(&mut self, id: TaskId) -> Result<bool, ControllerError> {
        let mut prompt = SubmittedEdit(&mut self.input);
        self.controller.edit_with(id, &mut prompt)
    }

    /// Reload after the store file changed underneath us
    pub fn reload(&mut self) {
        let previous = self.cursor().unwrap_or(0);
        match self.controller.reload_if_changed() {
            Ok(true) => {
                // Ids were reassigned; the old selection means nothing now
                self.selected = None;
                self.select_index(previous);
                if let Mode::Edit(_) | Mode::ConfirmDelete(_) = self.mode {
                    self.mode = Mode::Navigate;
                    self.input.clear();
                }
                self.info("Reloaded: tasks changed on disk");
            }
            Ok(false) => {}
            Err(e) => self.error(e),
        }
    }
}

/// Switch to the alternate screen with bracketed paste on, so a pasted
/// newline arrives inside one `Event::Paste` instead of as Enter.
fn enter_screen(out: &mut impl io::Write) -> io::Result<()> {
    execute!(out, EnterAlternateScreen, EnableBracketedPaste)
}

fn leave_screen(out: &mut impl io::Write) -> io::Result<()> {
    execute!(out, DisableBracketedPaste, LeaveAlternateScreen)
}

/// Run the TUI against the store at `store_path`
pub fn run(config: Config, store_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let store: BoxedStore = Box::new(FileStore::open(&store_path));
    let controller = Controller::load(store, config.storage.key.clone(), config.ui.default_filter)
        .map_err(TuiError::from)?;
    let mut app = App::new(controller, &config);

    // Missing watcher only costs live reload
    let watcher = StoreWatcher::start(&store_path).ok();

    let (width, height) = crossterm::terminal::size().map_err(TuiError::from)?;
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Err(TuiError::TerminalTooSmall { width, height }.into());
    }

    enable_raw_mode().map_err(TuiError::from)?;
    let mut stdout = io::stdout();
    if let Err(e) = enter_screen(&mut stdout) {
        let _ = leave_screen(&mut stdout);
        let _ = disable_raw_mode();
        return Err(TuiError::from(e).into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = leave_screen(&mut io::stdout());
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    disable_raw_mode()?;
    leave_screen(terminal.backend_mut())?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if let Some(w) = watcher
            && !w.poll().is_empty()
        {
            app.reload();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
