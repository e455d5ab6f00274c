use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Session-durable identity of a task.
///
/// Ids are handed out by [`crate::ops::task_ops::TaskList`]: `1..=n` for the
/// tasks found at load, then `max + 1` for every new task. They are never
/// persisted and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(TaskId)
    }
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    /// Display text
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Task {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// The persisted form of this task (identity is dropped)
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            text: self.text.clone(),
            completed: self.completed,
        }
    }
}

/// One element of the persisted snapshot: `{"text": …, "completed": …}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub text: String,
    pub completed: bool,
}
