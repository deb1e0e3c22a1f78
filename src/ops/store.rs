use std::cell::Cell;
use std::rc::Rc;

use crate::io::storage::{Storage, StorageError};
use crate::model::item::{CreateItemRequest, TodoItem, UpdateItemRequest};

/// The slot holding the JSON array of items
pub const TODO_ITEMS_KEY: &str = "ng-todo.items";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no TODO item with ID {0} was found")]
    NotFound(i64),
    #[error("slot {key} does not hold a TODO item array: {source}")]
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("could not encode TODO items: {0}")]
    Encode(serde_json::Error),
    #[error("no free item ID after {0}")]
    IdsExhausted(i64),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" in milliseconds since the Unix epoch
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<i64>>);

impl ManualClock {
    pub fn new(start: i64) -> Self {
        ManualClock(Rc::new(Cell::new(start)))
    }

    pub fn set(&self, millis: i64) {
        self.0.set(millis);
    }

    pub fn advance(&self, millis: i64) {
        self.0.set(self.0.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.get()
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// CRUD over the item array kept in the [`TODO_ITEMS_KEY`] slot.
///
/// There is no cached copy: every operation reads the slot, mutates, and
/// writes the whole array back. A slot that fails to decode is never
/// overwritten.
pub struct TodoStore<S, C = SystemClock> {
    storage: S,
    clock: C,
}

impl<S: Storage> TodoStore<S, SystemClock> {
    pub fn new(storage: S) -> Self {
        TodoStore {
            storage,
            clock: SystemClock,
        }
    }
}

impl<S: Storage, C: Clock> TodoStore<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        TodoStore { storage, clock }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All items in insertion order. An absent slot is an empty list.
    pub fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        self.read()
    }

    /// Append a new, not-done item stamped with the current time.
    pub fn create(&mut self, req: CreateItemRequest) -> Result<TodoItem, StoreError> {
        let mut items = self.read()?;

        // The id is the creation timestamp; two creates inside the same
        // millisecond would collide, so step past the newest id.
        let mut now = self.clock.now_millis();
        if let Some(max_id) = items.iter().map(|i| i.id).max()
            && now <= max_id
        {
            now = max_id
                .checked_add(1)
                .ok_or(StoreError::IdsExhausted(max_id))?;
        }

        let item = TodoItem {
            id: now,
            created_at: now,
            last_updated_at: now,
            title: req.title,
            priority: req.priority,
            is_done: false,
        };
        items.push(item.clone());
        self.write(&items)?;
        tracing::info!(id = item.id, priority = %item.priority, "item created");
        Ok(item)
    }

    /// Overwrite the mutable fields of an existing item.
    pub fn update(&mut self, req: UpdateItemRequest) -> Result<TodoItem, StoreError> {
        let mut items = self.read()?;
        let now = self.clock.now_millis();
        let existing = items
            .iter_mut()
            .find(|item| item.id == req.id)
            .ok_or(StoreError::NotFound(req.id))?;

        existing.title = req.title;
        existing.priority = req.priority;
        existing.is_done = req.is_done;
        existing.last_updated_at = now.max(existing.created_at);
        let updated = existing.clone();

        self.write(&items)?;
        tracing::info!(id = updated.id, done = updated.is_done, "item updated");
        Ok(updated)
    }

    /// Remove one item; fails if it does not exist.
    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        let mut items = self.read()?;
        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;
        items.remove(index);
        self.write(&items)?;
        tracing::info!(id, "item deleted");
        Ok(())
    }

    /// Remove every listed item that exists. Unknown ids are ignored.
    /// Returns how many items were removed.
    pub fn delete_many(&mut self, ids: &[i64]) -> Result<usize, StoreError> {
        let mut items = self.read()?;
        let before = items.len();
        items.retain(|item| !ids.contains(&item.id));
        let removed = before - items.len();
        self.write(&items)?;
        tracing::info!(requested = ids.len(), removed, "items deleted");
        Ok(removed)
    }

    fn read(&self) -> Result<Vec<TodoItem>, StoreError> {
        let raw = match self.storage.get(TODO_ITEMS_KEY)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(Vec::new()),
        };
        serde_json::from_str(&raw).map_err(|e| StoreError::Decode {
            key: TODO_ITEMS_KEY,
            source: e,
        })
    }

    fn write(&mut self, items: &[TodoItem]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items).map_err(StoreError::Encode)?;
        self.storage.set(TODO_ITEMS_KEY, &raw)?;
        Ok(())
    }
}
