use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::item::Priority;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the key hint line in the status row
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Start the TUI with the add-item input focused
    #[serde(default = "default_true")]
    pub autofocus_add: bool,
    /// Color overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            autofocus_add: true,
            colors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive, overridden by TD_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Priority given to newly added items
    #[serde(default = "default_priority")]
    pub priority: Priority,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            priority: default_priority(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_priority() -> Priority {
    Priority::Low
}
