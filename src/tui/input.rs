use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::filter::Filter;
use crate::model::task::TaskId;

use super::app::{App, Mode};
use super::line_input::LineInput;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if app.show_help {
        // Any key closes help
        app.show_help = false;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add | Mode::Edit(_) => handle_line_input(app, key),
        Mode::ConfirmDelete(_) => handle_confirm(app, key),
    }
}

/// Bracketed paste goes into the input line when it has focus
pub fn handle_paste(app: &mut App, text: &str) {
    if matches!(app.mode, Mode::Add | Mode::Edit(_)) {
        app.input.insert_str(text);
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status = None;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.select_index(0),
        KeyCode::Char('G') | KeyCode::End => app.select_index(usize::MAX),
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => toggle_selected(app),
        KeyCode::Char('d') | KeyCode::Delete => request_delete(app),
        KeyCode::Char('e') => begin_edit(app),
        KeyCode::Char('a') | KeyCode::Char('i') => {
            app.input.clear();
            app.mode = Mode::Add;
        }
        KeyCode::Char('f') | KeyCode::Tab => {
            let next = app.controller.filter().next();
            set_filter(app, next);
        }
        KeyCode::BackTab => {
            let prev = app.controller.filter().next().next();
            set_filter(app, prev);
        }
        KeyCode::Char('1') => set_filter(app, Filter::All),
        KeyCode::Char('2') => set_filter(app, Filter::Complete),
        KeyCode::Char('3') => set_filter(app, Filter::Incomplete),
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
}

fn set_filter(app: &mut App, filter: Filter) {
    let previous = app.cursor().unwrap_or(0);
    app.controller.set_filter(filter);
    app.reconcile_cursor(previous);
}

fn toggle_selected(app: &mut App) {
    let Some(id) = app.selected else {
        return;
    };
    let previous = app.cursor().unwrap_or(0);
    let result = app.controller.toggle_completed(id);
    if let Some(completed) = app.report(result) {
        app.reconcile_cursor(previous);
        app.info(if completed {
            format!("#{} done", id)
        } else {
            format!("#{} reopened", id)
        });
    }
}

fn request_delete(app: &mut App) {
    let Some(id) = app.selected else {
        return;
    };
    if app.confirm_delete {
        app.mode = Mode::ConfirmDelete(id);
    } else {
        delete_task(app, id);
    }
}

fn delete_task(app: &mut App, id: TaskId) {
    let previous = app.cursor().unwrap_or(0);
    let result = app.controller.delete(id);
    if let Some(task) = app.report(result) {
        app.reconcile_cursor(previous);
        app.info(format!("Deleted \"{}\"", task.text));
    }
}

fn begin_edit(app: &mut App) {
    let Some(id) = app.selected else {
        return;
    };
    let Some(text) = app.controller.task(id).map(|t| t.text.clone()) else {
        return;
    };
    app.input = LineInput::with_text(&text);
    app.mode = Mode::Edit(id);
}

fn handle_confirm(app: &mut App, key: KeyEvent) {
    let Mode::ConfirmDelete(id) = app.mode else {
        return;
    };
    app.mode = Mode::Navigate;
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => delete_task(app, id),
        _ => app.info("Delete cancelled"),
    }
}

fn handle_line_input(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            app.input.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => submit_line(app),
        KeyCode::Char('w') if ctrl => app.input.delete_word_back(),
        KeyCode::Char('u') if ctrl => app.input.clear(),
        KeyCode::Char('a') if ctrl => app.input.move_home(),
        KeyCode::Char('e') if ctrl => app.input.move_end(),
        KeyCode::Char(c) if !ctrl => app.input.insert_char(c),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        _ => {}
    }
}

fn submit_line(app: &mut App) {
    match app.mode {
        Mode::Add => {
            let text = app.input.take();
            // Stay in add mode so several tasks can be typed in a row
            match app.controller.add(&text) {
                Ok(Some(id)) => {
                    if app.controller.rows().iter().any(|r| r.id == id) {
                        app.selected = Some(id);
                    } else {
                        app.reconcile_cursor(0);
                    }
                    app.info(format!("Added #{}", id));
                }
                Ok(None) => app.mode = Mode::Navigate,
                Err(e) => app.error(e),
            }
        }
        Mode::Edit(id) => {
            app.mode = Mode::Navigate;
            match app.commit_edit(id) {
                Ok(true) => app.info(format!("#{} updated", id)),
                Ok(false) => app.info("Edit discarded: text was empty"),
                Err(e) => app.error(e),
            }
        }
        _ => {}
    }
}
