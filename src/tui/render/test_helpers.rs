use std::cell::RefCell;
use std::rc::Rc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::storage::{MemoryStorage, Storage, StorageError};
use crate::model::{AppConfig, CreateItemRequest, Priority};
use crate::ops::list::ListController;
use crate::ops::store::{TODO_ITEMS_KEY, TodoStore};
use crate::tui::app::{App, AppList};

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app at the given size.
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| super::render(frame, app))
}

/// A loaded list over in-memory storage holding `titles`, in order.
pub fn memory_list(titles: &[&str]) -> AppList {
    let storage: Box<dyn Storage> = Box::new(MemoryStorage::new());
    let mut store = TodoStore::new(storage);
    for title in titles {
        store
            .create(CreateItemRequest {
                title: title.to_string(),
                priority: Priority::Low,
            })
            .unwrap();
    }
    let mut list = ListController::new(store);
    list.init().unwrap();
    list
}

/// In-memory storage shared between handles, standing in for a file that
/// another process writes to.
#[derive(Clone, Default)]
pub struct SharedStorage(Rc<RefCell<MemoryStorage>>);

impl Storage for SharedStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set(key, value)
    }
}

/// An app over [`SharedStorage`] holding `titles`, plus a second handle to
/// the same storage.
pub fn shared_app(titles: &[&str]) -> (App, SharedStorage) {
    let shared = SharedStorage::default();
    let mut other = TodoStore::new(shared.clone());
    for title in titles {
        other
            .create(CreateItemRequest {
                title: title.to_string(),
                priority: Priority::Low,
            })
            .unwrap();
    }
    let storage: Box<dyn Storage> = Box::new(shared.clone());
    let mut list = ListController::new(TodoStore::new(storage));
    list.init().unwrap();
    (App::new(list, &AppConfig::default()), shared)
}

/// An app with default config over [`memory_list`].
pub fn app_with_items(titles: &[&str]) -> App {
    App::new(memory_list(titles), &AppConfig::default())
}

/// An app whose storage slot holds something that is not an item array.
/// Not initialized yet.
pub fn app_with_corrupt_store() -> App {
    let storage: Box<dyn Storage> = Box::new(MemoryStorage::with_slot(TODO_ITEMS_KEY, "garbage"));
    let list = ListController::new(TodoStore::new(storage));
    App::new(list, &AppConfig::default())
}
