use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::storage::{FileStorage, Storage};
use crate::io::watcher::StorageWatcher;
use crate::model::config::AppConfig;
use crate::ops::editor::{EditorEvent, ItemEditor};
use crate::ops::list::{ListController, NavKey};
use crate::ops::store::{StoreError, TodoStore};

use super::input;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;

/// The list as the TUI sees it: any storage, wall clock
pub type AppList = ListController<Box<dyn Storage>>;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keys drive the list (no text input has focus)
    Navigate,
    /// Typing into the add-item input
    Add,
    /// Typing into the title input of one item
    Edit,
}

/// One-line message in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    pub list: AppList,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_help: bool,
    pub show_key_hints: bool,
    pub add_input: TextInput,
    pub edit_input: TextInput,
    /// Editor of the item whose title is being edited
    pub editor: Option<ItemEditor>,
    /// Whether the edit input has received focus after being rendered
    pub edit_input_focused: bool,
    pub status: Option<StatusMessage>,
    /// First visible row of the list
    pub scroll_offset: usize,
}

impl App {
    pub fn new(list: AppList, config: &AppConfig) -> Self {
        App {
            list,
            mode: if config.ui.autofocus_add {
                Mode::Add
            } else {
                Mode::Navigate
            },
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            add_input: TextInput::new(),
            edit_input: TextInput::new(),
            editor: None,
            edit_input_focused: false,
            status: None,
            scroll_offset: 0,
        }
    }

    /// Load the list for the first time.
    pub fn init(&mut self) {
        if let Err(e) = self.list.init() {
            self.report_error(&e);
        }
    }

    /// Re-read the store, e.g. after another process wrote to it.
    pub fn reload(&mut self) {
        if let Err(e) = self.list.refresh() {
            self.report_error(&e);
            return;
        }
        if let Some(editor) = &mut self.editor {
            match self.list.item(editor.item().id) {
                Some(fresh) => editor.set_item(fresh.clone()),
                None => {
                    tracing::info!(id = editor.item().id, "edited item vanished");
                    self.editor = None;
                    self.edit_input_focused = false;
                    self.mode = Mode::Navigate;
                }
            }
        }
    }

    /// Hook run after every completed draw.
    ///
    /// Focus for a freshly opened edit input is handed over here, once the
    /// input exists on screen.
    pub fn after_render(&mut self) {
        if let Some(editor) = &mut self.editor
            && editor.take_focus_request()
        {
            self.edit_input.select_all();
            self.edit_input_focused = true;
        }
    }

    pub fn report_error(&mut self, e: &StoreError) {
        self.status = Some(StatusMessage {
            text: e.to_string(),
            is_error: true,
        });
    }

    pub fn report_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Carry out an event raised by the editor of item `id`.
    pub fn dispatch(&mut self, id: i64, event: EditorEvent) {
        let result = match event {
            EditorEvent::Modified(item) => self.list.modify(&item),
            EditorEvent::Deleted => self.list.delete(id),
            EditorEvent::ToggleSelection(checked) => {
                self.list.set_selected(id, checked);
                Ok(())
            }
        };
        if let Err(e) = result {
            self.report_error(&e);
        }
    }

    /// Forward a key of the list's keyboard protocol.
    ///
    /// Delete with a selection goes straight to the bulk delete so the
    /// status row can report how many items the store actually removed.
    pub fn nav(&mut self, key: NavKey) {
        if key == NavKey::Delete && !self.list.selection().is_empty() {
            match self.list.bulk_delete() {
                Ok(removed) => self.report_info(format!("deleted {} item(s)", removed)),
                Err(e) => self.report_error(&e),
            }
            return;
        }
        if let Err(e) = self.list.handle_key(key) {
            self.report_error(&e);
        }
    }

    /// Editor over the focused item, if any
    fn focused_editor(&self) -> Option<ItemEditor> {
        self.list.focused_item().cloned().map(ItemEditor::new)
    }

    pub fn toggle_priority_focused(&mut self) {
        if let Some(editor) = self.focused_editor() {
            self.dispatch(editor.item().id, editor.toggle_priority());
        }
    }

    pub fn toggle_done_focused(&mut self) {
        if let Some(editor) = self.focused_editor() {
            self.dispatch(editor.item().id, editor.toggle_done());
        }
    }

    pub fn delete_focused(&mut self) {
        if let Some(editor) = self.focused_editor() {
            self.dispatch(editor.item().id, editor.delete());
        }
    }

    /// Select or deselect every item through the editors' checkbox events.
    pub fn select_all(&mut self, checked: bool) {
        let editors: Vec<ItemEditor> = self
            .list
            .items()
            .iter()
            .cloned()
            .map(ItemEditor::new)
            .collect();
        for editor in editors {
            self.dispatch(editor.item().id, editor.set_selected(checked));
        }
    }

    /// Open the title input for the focused item.
    pub fn begin_edit_focused(&mut self) {
        let Some(mut editor) = self.focused_editor() else {
            return;
        };
        editor.begin_edit();
        self.edit_input = TextInput::with_text(editor.draft());
        self.edit_input_focused = false;
        self.editor = Some(editor);
        self.mode = Mode::Edit;
    }

    /// Commit the title input. A blank title keeps the input open.
    pub fn submit_edit(&mut self) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        editor.set_draft(self.edit_input.text());
        let id = editor.item().id;
        if let Some(event) = editor.submit() {
            self.editor = None;
            self.edit_input_focused = false;
            self.mode = Mode::Navigate;
            self.dispatch(id, event);
        }
    }

    pub fn cancel_edit(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.cancel();
        }
        self.editor = None;
        self.edit_input_focused = false;
        self.mode = Mode::Navigate;
    }

    /// Create an item from the add input. Blank input is ignored.
    pub fn submit_add(&mut self) {
        match self.list.add(self.add_input.text()) {
            Ok(Some(_)) => self.add_input.clear(),
            Ok(None) => {}
            Err(e) => self.report_error(&e),
        }
    }

    pub fn is_editing(&self, id: i64) -> bool {
        self.editor.as_ref().is_some_and(|e| e.item().id == id)
    }
}

/// Run the TUI application against the data directory.
pub fn run(data_dir: &Path, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Box<dyn Storage> = Box::new(FileStorage::open(data_dir)?);
    let list = ListController::new(TodoStore::new(storage))
        .with_default_priority(config.defaults.priority);

    let mut app = App::new(list, config);
    app.init();

    let watcher = match StorageWatcher::start(data_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "external changes will not be picked up");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    tracing::info!(data_dir = %data_dir.display(), "tui started");
    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StorageWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;
        app.after_render();

        if let Some(w) = watcher
            && !w.poll().is_empty()
        {
            app.reload();
            continue;
        }

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    tracing::info!("tui stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn autofocus_add_starts_in_add_mode() {
        let app = app_with_items(&[]);
        assert_eq!(app.mode, Mode::Add);

        let mut config = AppConfig::default();
        config.ui.autofocus_add = false;
        let app = App::new(memory_list(&[]), &config);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn begin_edit_defers_focus_until_after_render() {
        let mut app = app_with_items(&["first"]);
        app.list.set_focus(Some(0));
        app.begin_edit_focused();
        assert_eq!(app.mode, Mode::Edit);
        assert!(!app.edit_input_focused);
        assert!(!app.edit_input.is_all_selected());

        app.after_render();
        assert!(app.edit_input_focused);
        assert!(app.edit_input.is_all_selected());

        // Only the first render after begin_edit hands over focus
        app.edit_input.move_home();
        app.after_render();
        assert!(!app.edit_input.is_all_selected());
    }

    #[test]
    fn submit_edit_persists_trimmed_title() {
        let mut app = app_with_items(&["first"]);
        app.list.set_focus(Some(0));
        app.begin_edit_focused();
        app.after_render();
        app.edit_input.insert_str("  renamed  ");
        app.submit_edit();

        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.editor.is_none());
        assert_eq!(app.list.items()[0].title, "renamed");
    }

    #[test]
    fn blank_submit_keeps_edit_mode() {
        let mut app = app_with_items(&["first"]);
        app.list.set_focus(Some(0));
        app.begin_edit_focused();
        app.after_render();
        app.edit_input.insert_str("   ");
        let rev = app.list.revision();
        app.submit_edit();

        assert_eq!(app.mode, Mode::Edit);
        assert!(app.editor.is_some());
        assert_eq!(app.list.revision(), rev);
        assert_eq!(app.list.items()[0].title, "first");
    }

    #[test]
    fn focused_toggles_go_through_the_store() {
        let mut app = app_with_items(&["a"]);
        app.list.set_focus(Some(0));
        app.toggle_done_focused();
        app.toggle_priority_focused();
        let item = &app.list.items()[0];
        assert!(item.is_done);
        assert_eq!(item.priority, crate::model::Priority::High);
    }

    #[test]
    fn delete_focused_removes_item() {
        let mut app = app_with_items(&["a", "b"]);
        app.list.set_focus(Some(0));
        app.delete_focused();
        assert_eq!(app.list.items().len(), 1);
        assert_eq!(app.list.items()[0].title, "b");
    }

    #[test]
    fn submit_add_clears_input_only_on_success() {
        let mut app = app_with_items(&[]);
        app.add_input.insert_str("   ");
        app.submit_add();
        assert_eq!(app.add_input.text(), "   ");
        assert!(app.list.items().is_empty());

        app.add_input.clear();
        app.add_input.insert_str("milk");
        app.submit_add();
        assert_eq!(app.add_input.text(), "");
        assert_eq!(app.list.items().len(), 1);
    }

    #[test]
    fn select_all_and_clear() {
        let mut app = app_with_items(&["a", "b"]);
        app.select_all(true);
        assert_eq!(app.list.selection().len(), 2);
        app.select_all(false);
        assert!(app.list.selection().is_empty());
    }

    #[test]
    fn bulk_delete_reports_removed_count() {
        let mut app = app_with_items(&["a", "b"]);
        let a = app.list.items()[0].id;
        app.list.set_selected(a, true);
        app.list.set_selected(4242, true);
        app.nav(NavKey::Delete);

        assert_eq!(app.list.items().len(), 1);
        let status = app.status.clone().unwrap();
        assert!(!status.is_error);
        assert_eq!(status.text, "deleted 1 item(s)");
    }

    #[test]
    fn reload_closes_editor_of_vanished_item() {
        let (mut app, storage) = shared_app(&["a", "b"]);
        let b = app.list.items()[1].id;
        app.list.set_focus(Some(1));
        app.begin_edit_focused();
        app.after_render();
        assert_eq!(app.mode, Mode::Edit);

        TodoStore::new(storage).delete(b).unwrap();
        app.reload();

        assert!(app.editor.is_none());
        assert!(!app.edit_input_focused);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.list.items().len(), 1);
        assert_eq!(app.list.focus(), Some(0));
    }

    #[test]
    fn reload_keeps_editor_of_surviving_item() {
        let (mut app, storage) = shared_app(&["a"]);
        app.list.set_focus(Some(0));
        app.begin_edit_focused();
        app.after_render();

        let mut other = TodoStore::new(storage);
        let mut req = crate::model::UpdateItemRequest::from(&app.list.items()[0]);
        req.is_done = true;
        other.update(req).unwrap();
        app.reload();

        assert_eq!(app.mode, Mode::Edit);
        assert!(app.editor.as_ref().unwrap().item().is_done);
    }

    #[test]
    fn reload_prunes_selection_and_clamps_focus() {
        let (mut app, storage) = shared_app(&["a", "b", "c"]);
        let ids: Vec<i64> = app.list.items().iter().map(|i| i.id).collect();
        app.list.set_selected(ids[0], true);
        app.list.set_selected(ids[2], true);
        app.list.set_focus(Some(2));

        TodoStore::new(storage).delete(ids[2]).unwrap();
        app.reload();

        assert_eq!(app.list.items().len(), 2);
        assert!(app.list.is_selected(ids[0]));
        assert!(!app.list.is_selected(ids[2]));
        assert_eq!(app.list.selection().len(), 1);
        assert_eq!(app.list.focus(), Some(1));
    }

    #[test]
    fn store_error_lands_in_status_row() {
        let mut app = app_with_corrupt_store();
        app.init();
        let status = app.status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains("ng-todo.items"));
    }
}
