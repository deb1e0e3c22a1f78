use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::storage::STORAGE_FILE;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum StorageEvent {
    /// The slot file was written by someone (possibly this process).
    Changed(PathBuf),
}

/// Watches the data directory for writes to the slot file.
pub struct StorageWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StorageEvent>,
}

impl StorageWatcher {
    /// Start watching `data_dir`.
    /// Returns a `StorageWatcher` whose `poll()` method should be called each tick.
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                // Atomic writes land as a rename onto storage.json; temp files
                // and the lock file are ignored.
                for path in event.paths {
                    if is_storage_file(&path) {
                        let _ = tx.send(StorageEvent::Changed(path));
                    }
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(StorageWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending events.
    /// Returns all queued events (may be empty).
    pub fn poll(&self) -> Vec<StorageEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

fn is_storage_file(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()) == Some(STORAGE_FILE)
}
