use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::task::Task;

/// Display-time predicate selecting tasks by completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Complete,
    Incomplete,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Complete, Filter::Incomplete];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Complete => task.completed,
            Filter::Incomplete => !task.completed,
        }
    }

    /// Next filter in bar order, wrapping around
    pub fn next(self) -> Filter {
        match self {
            Filter::All => Filter::Complete,
            Filter::Complete => Filter::Incomplete,
            Filter::Incomplete => Filter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Complete => "complete",
            Filter::Incomplete => "incomplete",
        }
    }

    /// Title shown in the filter bar
    pub fn title(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Complete => "Complete",
            Filter::Incomplete => "Incomplete",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown filter '{0}' (expected all, complete or incomplete)")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "complete" | "completed" | "done" => Ok(Filter::Complete),
            "incomplete" | "open" | "todo" => Ok(Filter::Incomplete),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}
