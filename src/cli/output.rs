use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::model::{Priority, TodoItem};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub id: i64,
    pub title: String,
    pub priority: Priority,
    pub done: bool,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub last_updated_at: i64,
}

#[derive(Serialize)]
pub struct RemovedJson {
    pub removed: usize,
}

pub fn item_to_json(item: &TodoItem) -> ItemJson {
    ItemJson {
        id: item.id,
        title: item.title.clone(),
        priority: item.priority,
        done: item.is_done,
        created_at: item.created_at,
        last_updated_at: item.last_updated_at,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One listing line: `<id> [x] <priority> <title>`
pub fn format_item_line(item: &TodoItem) -> String {
    let done = if item.is_done { "x" } else { " " };
    format!(
        "{} [{}] {:<8} {}",
        item.id,
        done,
        item.priority.as_str(),
        item.title
    )
}

/// Multi-line detail view of an item
pub fn format_item_detail(item: &TodoItem) -> Vec<String> {
    vec![
        format_item_line(item),
        format!("created: {}", format_timestamp(item.created_at)),
        format!("updated: {}", format_timestamp(item.last_updated_at)),
    ]
}

/// Local date and time for a millisecond timestamp
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => millis.to_string(),
    }
}
