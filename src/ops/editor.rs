use crate::model::item::TodoItem;

/// Whether an item shows its title or an input for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    View,
    Edit,
}

/// Intents an item raises for the list to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A modified copy of the item; persist it
    Modified(TodoItem),
    /// Remove this item
    Deleted,
    /// The selection checkbox changed to this state
    ToggleSelection(bool),
}

/// View/edit state for a single list item.
///
/// Every action returns the event to hand to the list; the editor never
/// learns whether the store accepted it. When the list republishes, feed
/// the fresh copy back in with [`ItemEditor::set_item`].
#[derive(Debug, Clone)]
pub struct ItemEditor {
    item: TodoItem,
    mode: EditorMode,
    draft: String,
    focus_requested: bool,
}

impl ItemEditor {
    pub fn new(item: TodoItem) -> Self {
        ItemEditor {
            item,
            mode: EditorMode::View,
            draft: String::new(),
            focus_requested: false,
        }
    }

    pub fn item(&self) -> &TodoItem {
        &self.item
    }

    /// Replace the underlying item without leaving edit mode
    pub fn set_item(&mut self, item: TodoItem) {
        self.item = item;
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditorMode::Edit
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Switch to edit mode with the current title preloaded.
    ///
    /// The input only exists after the next render, so focusing it is
    /// requested here and carried out by whoever renders, via
    /// [`ItemEditor::take_focus_request`].
    pub fn begin_edit(&mut self) {
        self.draft = self.item.title.clone();
        self.mode = EditorMode::Edit;
        self.focus_requested = true;
    }

    /// Returns true once per [`ItemEditor::begin_edit`].
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Commit the draft as the new title.
    ///
    /// A blank draft keeps edit mode and emits nothing.
    pub fn submit(&mut self) -> Option<EditorEvent> {
        if self.mode != EditorMode::Edit {
            return None;
        }
        let title = self.draft.trim();
        if title.is_empty() {
            return None;
        }
        let mut modified = self.item.clone();
        modified.title = title.to_string();
        self.mode = EditorMode::View;
        self.focus_requested = false;
        Some(EditorEvent::Modified(modified))
    }

    /// Leave edit mode without emitting anything.
    pub fn cancel(&mut self) {
        self.mode = EditorMode::View;
        self.focus_requested = false;
        self.draft.clear();
    }

    /// Flip priority low ↔ high.
    pub fn toggle_priority(&self) -> EditorEvent {
        let mut modified = self.item.clone();
        modified.priority = modified.priority.toggled();
        EditorEvent::Modified(modified)
    }

    pub fn toggle_done(&self) -> EditorEvent {
        let mut modified = self.item.clone();
        modified.is_done = !modified.is_done;
        EditorEvent::Modified(modified)
    }

    pub fn delete(&self) -> EditorEvent {
        EditorEvent::Deleted
    }

    pub fn set_selected(&self, checked: bool) -> EditorEvent {
        EditorEvent::ToggleSelection(checked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn item() -> TodoItem {
        TodoItem {
            id: 10,
            created_at: 10,
            last_updated_at: 20,
            title: "water plants".into(),
            priority: Priority::Low,
            is_done: false,
        }
    }

    fn modified(event: EditorEvent) -> TodoItem {
        match event {
            EditorEvent::Modified(item) => item,
            other => panic!("expected Modified, got {:?}", other),
        }
    }

    #[test]
    fn starts_in_view_mode() {
        let mut editor = ItemEditor::new(item());
        assert_eq!(editor.mode(), EditorMode::View);
        assert!(!editor.take_focus_request());
    }

    #[test]
    fn begin_edit_preloads_title_and_requests_focus_once() {
        let mut editor = ItemEditor::new(item());
        editor.begin_edit();
        assert!(editor.is_editing());
        assert_eq!(editor.draft(), "water plants");
        assert!(editor.take_focus_request());
        assert!(!editor.take_focus_request());
    }

    #[test]
    fn submit_emits_trimmed_copy_and_returns_to_view() {
        let mut editor = ItemEditor::new(item());
        editor.begin_edit();
        editor.set_draft("  water the ferns ");
        let out = modified(editor.submit().unwrap());
        assert_eq!(out.title, "water the ferns");
        assert_eq!(out.id, 10);
        assert_eq!(out.priority, Priority::Low);
        assert_eq!(out.last_updated_at, 20);
        assert_eq!(editor.mode(), EditorMode::View);
        // The editor's own copy waits for the list to republish
        assert_eq!(editor.item().title, "water plants");
    }

    #[test]
    fn whitespace_submit_is_a_noop() {
        let mut editor = ItemEditor::new(item());
        editor.begin_edit();
        editor.set_draft(" \t  ");
        assert_eq!(editor.submit(), None);
        assert!(editor.is_editing());
        assert_eq!(editor.item().title, "water plants");
    }

    #[test]
    fn submit_outside_edit_mode_emits_nothing() {
        let mut editor = ItemEditor::new(item());
        editor.set_draft("new");
        assert_eq!(editor.submit(), None);
    }

    #[test]
    fn cancel_leaves_edit_mode_silently() {
        let mut editor = ItemEditor::new(item());
        editor.begin_edit();
        editor.cancel();
        assert_eq!(editor.mode(), EditorMode::View);
        assert!(!editor.take_focus_request());
    }

    #[test]
    fn priority_toggle_is_its_own_inverse() {
        for start in [Priority::Low, Priority::High] {
            let mut it = item();
            it.priority = start;
            let once = modified(ItemEditor::new(it).toggle_priority());
            assert_ne!(once.priority, start);
            let twice = modified(ItemEditor::new(once).toggle_priority());
            assert_eq!(twice.priority, start);
        }
    }

    #[test]
    fn priority_toggle_never_produces_moderate() {
        let mut it = item();
        it.priority = Priority::Moderate;
        let out = modified(ItemEditor::new(it).toggle_priority());
        assert_eq!(out.priority, Priority::Low);
    }

    #[test]
    fn done_toggle_changes_only_is_done() {
        let editor = ItemEditor::new(item());
        let out = modified(editor.toggle_done());
        let mut expected = item();
        expected.is_done = true;
        assert_eq!(out, expected);
    }

    #[test]
    fn delete_and_selection_events() {
        let editor = ItemEditor::new(item());
        assert_eq!(editor.delete(), EditorEvent::Deleted);
        assert_eq!(editor.set_selected(true), EditorEvent::ToggleSelection(true));
        assert_eq!(editor.set_selected(false), EditorEvent::ToggleSelection(false));
    }

    #[test]
    fn set_item_keeps_edit_mode() {
        let mut editor = ItemEditor::new(item());
        editor.begin_edit();
        let mut fresh = item();
        fresh.is_done = true;
        editor.set_item(fresh);
        assert!(editor.is_editing());
        assert!(editor.item().is_done);
    }
}
