use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::task::{Task, TaskId};
use crate::ops::task_ops::TaskRow;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub filter: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id,
        text: task.text.clone(),
        completed: task.completed,
    }
}

pub fn row_to_json(row: &TaskRow) -> TaskJson {
    TaskJson {
        id: row.id,
        text: row.label.clone(),
        completed: row.completed,
    }
}

pub fn recovery_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry.timestamp.to_rfc3339(),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.clone(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn check_char(completed: bool) -> char {
    if completed { 'x' } else { ' ' }
}

/// `[x] 3  walk the dog`
pub fn format_row_line(row: &TaskRow) -> String {
    format!("[{}] {:<3}{}", check_char(row.completed), row.id.0, row.label)
}

pub fn format_task_line(task: &Task) -> String {
    format!("[{}] {:<3}{}", check_char(task.completed), task.id.0, task.text)
}

/// Header plus fields and body for one recovery entry
pub fn format_recovery_entry(entry: &RecoveryEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{} [{}] {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.category,
        entry.description
    )];
    for (key, value) in &entry.fields {
        lines.push(format!("  {}: {}", key, value));
    }
    for line in entry.body.lines() {
        lines.push(format!("  | {}", line));
    }
    lines
}
