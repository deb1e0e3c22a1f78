use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Priority of a TODO item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    /// Valid in stored data, but never produced by the priority toggle
    Moderate,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Moderate => "moderate",
            Priority::High => "high",
        }
    }

    /// Binary flip used by the editor: low → high, anything else → low
    pub fn toggled(self) -> Priority {
        match self {
            Priority::Low => Priority::High,
            Priority::Moderate | Priority::High => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "moderate" => Ok(Priority::Moderate),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "invalid priority '{}' (expected: low, moderate, high)",
                other
            )),
        }
    }
}

/// A TODO list item as stored in the `ng-todo.items` slot.
///
/// Field names on the wire are camelCase so data written by earlier
/// versions of the list stays readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique ID (the creation timestamp)
    pub id: i64,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    /// Milliseconds since the Unix epoch, never earlier than `created_at`
    pub last_updated_at: i64,
    pub title: String,
    pub priority: Priority,
    pub is_done: bool,
}

/// Fields needed to create an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItemRequest {
    pub title: String,
    pub priority: Priority,
}

/// Fields needed to update an existing item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItemRequest {
    pub id: i64,
    pub title: String,
    pub priority: Priority,
    pub is_done: bool,
}

impl From<&TodoItem> for UpdateItemRequest {
    fn from(item: &TodoItem) -> Self {
        UpdateItemRequest {
            id: item.id,
            title: item.title.clone(),
            priority: item.priority,
            is_done: item.is_done,
        }
    }
}
