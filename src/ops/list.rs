use std::collections::HashSet;

use crate::io::storage::Storage;
use crate::model::item::{CreateItemRequest, Priority, TodoItem, UpdateItemRequest};
use crate::ops::store::{Clock, StoreError, SystemClock, TodoStore};

/// Keys the list reacts to when no text input has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Space,
    Delete,
}

/// The canonical in-memory view of the list.
///
/// Holds exactly one current copy of the items, refreshed from the store
/// after every mutation, plus the selection set and the keyboard focus
/// cursor. Neither the selection nor the cursor is persisted.
///
/// A failed store call is logged and returned; the view, selection, and
/// cursor are left as they were.
pub struct ListController<S, C = SystemClock> {
    store: TodoStore<S, C>,
    items: Vec<TodoItem>,
    selection: HashSet<i64>,
    focus: Option<usize>,
    default_priority: Priority,
    revision: u64,
}

impl<S: Storage, C: Clock> ListController<S, C> {
    pub fn new(store: TodoStore<S, C>) -> Self {
        ListController {
            store,
            items: Vec::new(),
            selection: HashSet::new(),
            focus: None,
            default_priority: Priority::Low,
            revision: 0,
        }
    }

    /// Priority given to items created through [`ListController::add`]
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Bumped every time a fresh list is published
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selection(&self) -> &HashSet<i64> {
        &self.selection
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selection.contains(&id)
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn focused_item(&self) -> Option<&TodoItem> {
        self.focus.and_then(|i| self.items.get(i))
    }

    pub fn item(&self, id: i64) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn store(&self) -> &TodoStore<S, C> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Store-backed intents
    // -----------------------------------------------------------------------

    /// Load the list for the first time.
    pub fn init(&mut self) -> Result<(), StoreError> {
        self.refresh()
    }

    /// Re-read the store and publish the result.
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        let items = logged("list", self.store.list())?;
        self.publish(items);
        Ok(())
    }

    /// Create an item from user input, keeping the title as typed.
    ///
    /// Blank titles are rejected before the store is touched and yield
    /// `Ok(None)`.
    pub fn add(&mut self, title: &str) -> Result<Option<TodoItem>, StoreError> {
        if title.trim().is_empty() {
            return Ok(None);
        }
        let created = logged(
            "create",
            self.store.create(CreateItemRequest {
                title: title.to_string(),
                priority: self.default_priority,
            }),
        )?;
        self.refresh()?;
        Ok(Some(created))
    }

    /// Persist a modified copy of an item.
    pub fn modify(&mut self, item: &TodoItem) -> Result<(), StoreError> {
        logged("update", self.store.update(UpdateItemRequest::from(item)))?;
        self.refresh()
    }

    /// Delete a single item.
    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        logged("delete", self.store.delete(id))?;
        let items = logged("list", self.store.list())?;
        self.selection.remove(&id);
        self.publish(items);
        Ok(())
    }

    /// Delete every selected item. No-op with an empty selection.
    ///
    /// On success the selection is cleared and the cursor goes back to
    /// "none". Returns the number of items removed. If the store fails,
    /// including the re-read after the delete, the view, selection and
    /// cursor keep their old values.
    pub fn bulk_delete(&mut self) -> Result<usize, StoreError> {
        if self.selection.is_empty() {
            return Ok(0);
        }
        let mut ids: Vec<i64> = self.selection.iter().copied().collect();
        ids.sort_unstable();
        let removed = logged("delete_many", self.store.delete_many(&ids))?;
        let items = logged("list", self.store.list())?;
        self.selection.clear();
        self.focus = None;
        self.publish(items);
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // In-memory state
    // -----------------------------------------------------------------------

    /// Flip membership of `id` in the selection.
    pub fn toggle_selection(&mut self, id: i64) {
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Set membership of `id` explicitly (checkbox semantics).
    pub fn set_selected(&mut self, id: i64, checked: bool) {
        if checked {
            self.selection.insert(id);
        } else {
            self.selection.remove(&id);
        }
    }

    /// Move the cursor, clamped to the list.
    pub fn set_focus(&mut self, index: Option<usize>) {
        self.focus = match index {
            Some(i) if !self.items.is_empty() => Some(i.min(self.items.len() - 1)),
            _ => None,
        };
    }

    /// Apply one key of the keyboard protocol.
    ///
    /// Returns `Ok(true)` for every key in [`NavKey`]: the caller should not
    /// let the key reach anything else, even when it changed nothing.
    pub fn handle_key(&mut self, key: NavKey) -> Result<bool, StoreError> {
        let len = self.items.len();
        match key {
            NavKey::Up => {
                if len > 0 {
                    self.focus = match self.focus {
                        None | Some(0) => Some(len - 1),
                        Some(i) => Some(i.min(len) - 1),
                    };
                }
            }
            NavKey::Down => {
                if len > 0 {
                    self.focus = match self.focus {
                        Some(i) if i + 1 < len => Some(i + 1),
                        _ => Some(0),
                    };
                }
            }
            NavKey::Space => {
                if let Some(id) = self.focused_item().map(|item| item.id) {
                    self.toggle_selection(id);
                }
            }
            NavKey::Delete => {
                self.bulk_delete()?;
            }
        }
        Ok(true)
    }

    fn publish(&mut self, items: Vec<TodoItem>) {
        self.items = items;
        self.revision += 1;

        // Another process may have removed items behind our back
        let ids: HashSet<i64> = self.items.iter().map(|item| item.id).collect();
        self.selection.retain(|id| ids.contains(id));
        self.set_focus(self.focus);
    }
}

fn logged<T>(op: &'static str, result: Result<T, StoreError>) -> Result<T, StoreError> {
    result.inspect_err(|e| tracing::error!(op, error = %e, "store operation failed"))
}
