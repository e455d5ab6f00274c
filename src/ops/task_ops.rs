use serde::Serialize;

use crate::model::filter::Filter;
use crate::model::task::{Task, TaskId, TaskRecord};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task {0} not found")]
    NotFound(TaskId),
}

/// Ordered task list. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        TaskList {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Build a list from persisted records, assigning ids `1..=n`.
    pub fn from_records(records: Vec<TaskRecord>) -> Self {
        let mut list = TaskList::new();
        for record in records {
            let id = list.allocate_id();
            list.tasks.push(Task {
                id,
                text: record.text,
                completed: record.completed,
            });
        }
        list
    }

    pub fn to_records(&self) -> Vec<TaskRecord> {
        self.tasks.iter().map(Task::to_record).collect()
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    /// Append a task. Returns None (and changes nothing) when `text` is
    /// blank. The stored text is trimmed.
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.allocate_id();
        self.tasks.push(Task::new(id, text));
        Some(id)
    }

    /// Flip completion. Returns the new `completed` value.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<bool, TaskError> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    /// Set completion explicitly. Returns true if the value changed.
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<bool, TaskError> {
        let task = self.get_mut(id)?;
        let changed = task.completed != completed;
        task.completed = completed;
        Ok(changed)
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        Ok(self.tasks.remove(idx))
    }

    /// Replace the text of a task. Blank text is rejected: returns
    /// `Ok(false)` and leaves the task untouched. Accepted text is stored
    /// as given.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> Result<bool, TaskError> {
        let task = self.get_mut(id)?;
        if new_text.trim().is_empty() {
            return Ok(false);
        }
        task.text = new_text.to_string();
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Display list
// ---------------------------------------------------------------------------

/// An action every visible row offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    Toggle,
    Delete,
    Edit,
}

impl RowAction {
    /// Button label for this action on a row in the given state
    pub fn label(self, completed: bool) -> &'static str {
        match self {
            RowAction::Toggle if completed => "Undo",
            RowAction::Toggle => "Done",
            RowAction::Delete => "Delete",
            RowAction::Edit => "Edit",
        }
    }
}

/// One visible task in the display list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub label: String,
    pub completed: bool,
    pub actions: [RowAction; 3],
}

/// Derive the display list: the tasks matching `filter`, in list order.
/// Never mutates the list.
pub fn render(list: &TaskList, filter: Filter) -> Vec<TaskRow> {
    list.tasks()
        .iter()
        .filter(|t| filter.matches(t))
        .map(|t| TaskRow {
            id: t.id,
            label: t.text.clone(),
            completed: t.completed,
            actions: [RowAction::Toggle, RowAction::Delete, RowAction::Edit],
        })
        .collect()
}
