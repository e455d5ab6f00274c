use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::filter::Filter;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store file location (default: XDG data dir)
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Key the task list is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            file: None,
            key: default_key(),
        }
    }
}

fn default_key() -> String {
    "tasks".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Filter selected at startup. Never written back.
    #[serde(default)]
    pub default_filter: Filter,
    /// Ask y/n before deleting from the TUI
    #[serde(default)]
    pub confirm_delete: bool,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Theme overrides by name, e.g. `background = "#0C001B"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_filter: Filter::All,
            confirm_delete: false,
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}
