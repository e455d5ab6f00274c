//! The task list controller: owns the list, the current filter and the
//! store, and rebuilds the display list after every change.

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::store::{KeyValueStore, StoreError};
use crate::model::filter::Filter;
use crate::model::task::{Task, TaskId, TaskRecord};
use crate::ops::task_ops::{self, TaskError, TaskList, TaskRow};

/// Key the task list is stored under unless configured otherwise
pub const DEFAULT_KEY: &str = "tasks";

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("could not save tasks: {0}")]
    Store(#[from] StoreError),
}

/// Supplies replacement text when editing a task.
pub trait TextPrompt {
    /// Ask for text, seeded with `initial`. None means cancelled.
    fn prompt(&mut self, message: &str, initial: &str) -> Option<String>;
}

/// Read the persisted list. Absent or unparseable data yields an empty
/// list; unparseable data is copied to the store's recovery log first.
pub fn load<S: KeyValueStore>(store: &S, key: &str) -> Result<TaskList, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(TaskList::new());
    };
    match serde_json::from_str::<Vec<TaskRecord>>(&raw) {
        Ok(records) => Ok(TaskList::from_records(records)),
        Err(e) => {
            if let Some(dir) = store.recovery_dir() {
                recovery::log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Parser, "unreadable task list")
                        .field("Key", key)
                        .field("Error", e.to_string())
                        .body(raw),
                );
            }
            Ok(TaskList::new())
        }
    }
}

pub struct Controller<S> {
    store: S,
    key: String,
    list: TaskList,
    filter: Filter,
    rows: Vec<TaskRow>,
    /// Last value read from or written to the store
    snapshot: Option<String>,
}

impl<S: KeyValueStore> Controller<S> {
    /// Load the list stored under `key` and render it with `filter`.
    pub fn load(store: S, key: impl Into<String>, filter: Filter) -> Result<Self, StoreError> {
        let key = key.into();
        let snapshot = store.get(&key)?;
        let list = load(&store, &key)?;
        let mut controller = Controller {
            store,
            key,
            list,
            filter,
            rows: Vec::new(),
            snapshot,
        };
        controller.render();
        Ok(controller)
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// The display list as of the last render
    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.list.get(id)
    }

    /// Rebuild the display list from the current list and filter.
    pub fn render(&mut self) -> &[TaskRow] {
        self.rows = task_ops::render(&self.list, self.filter);
        &self.rows
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.render();
    }

    /// The serialized snapshot of the current list
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.list.to_records())
    }

    /// Write the full list to the store. On failure the snapshot goes to the
    /// recovery log before the error is returned.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let json = self.snapshot_json()?;
        match self.store.set(&self.key, &json) {
            Ok(()) => {
                self.snapshot = Some(json);
                Ok(())
            }
            Err(e) => {
                if let Some(dir) = self.store.recovery_dir() {
                    recovery::log_recovery(
                        dir,
                        RecoveryEntry::new(RecoveryCategory::Write, "tasks not saved")
                            .field("Key", &self.key)
                            .field("Error", e.to_string())
                            .body(json),
                    );
                }
                Err(e)
            }
        }
    }

    fn commit(&mut self) -> Result<(), ControllerError> {
        self.render();
        self.save()?;
        Ok(())
    }

    /// Append a task. Blank text is a no-op: nothing is written and None is
    /// returned.
    pub fn add(&mut self, text: &str) -> Result<Option<TaskId>, ControllerError> {
        let Some(id) = self.list.add(text) else {
            return Ok(None);
        };
        self.commit()?;
        Ok(Some(id))
    }

    /// Flip completion; returns the new value.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<bool, ControllerError> {
        let completed = self.list.toggle_completed(id)?;
        self.commit()?;
        Ok(completed)
    }

    /// Set completion; only writes when the value changes.
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<bool, ControllerError> {
        let changed = self.list.set_completed(id, completed)?;
        if changed {
            self.commit()?;
        }
        Ok(changed)
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Task, ControllerError> {
        let task = self.list.delete(id)?;
        if let Some(dir) = self.store.recovery_dir() {
            recovery::log_recovery(
                dir,
                RecoveryEntry::new(RecoveryCategory::Delete, format!("task {} deleted", id))
                    .field("Completed", task.completed.to_string())
                    .body(task.text.clone()),
            );
        }
        self.commit()?;
        Ok(task)
    }

    /// Replace a task's text. Blank text is rejected with `Ok(false)` and
    /// nothing is written.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> Result<bool, ControllerError> {
        if !self.list.edit(id, new_text)? {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Edit with text supplied by `prompt`. A cancelled prompt changes
    /// nothing.
    pub fn edit_with(
        &mut self,
        id: TaskId,
        prompt: &mut dyn TextPrompt,
    ) -> Result<bool, ControllerError> {
        let current = self
            .list
            .get(id)
            .ok_or(TaskError::NotFound(id))?
            .text
            .clone();
        match prompt.prompt("Edit task", &current) {
            Some(text) => self.edit(id, &text),
            None => Ok(false),
        }
    }

    /// Reload from the store if its value differs from the last one seen.
    /// Returns true when the list was replaced. Ids are reassigned.
    pub fn reload_if_changed(&mut self) -> Result<bool, StoreError> {
        let current = self.store.get(&self.key)?;
        if current == self.snapshot {
            return Ok(false);
        }
        self.list = load(&self.store, &self.key)?;
        self.snapshot = current;
        self.render();
        Ok(true)
    }
}
