mod common;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use common::*;
use edit::*;
use navigate::*;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    app.status = None;

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add => handle_add(app, key),
        Mode::Edit => handle_edit(app, key),
    }
}

/// Handle a bracketed paste event (terminal sends pasted text as a single string).
/// Only the active text input receives it.
pub fn handle_paste(app: &mut App, text: &str) {
    if text.is_empty() {
        return;
    }
    match app.mode {
        Mode::Add => app.add_input.insert_str(text),
        Mode::Edit => app.edit_input.insert_str(text),
        Mode::Navigate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::tui::render::test_helpers::*;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn navigate_app(titles: &[&str]) -> App {
        let mut app = app_with_items(titles);
        app.mode = Mode::Navigate;
        app
    }

    #[test]
    fn add_mode_creates_items_on_enter() {
        let mut app = app_with_items(&[]);
        type_str(&mut app, "buy milk");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "  ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.list.items().len(), 1);
        assert_eq!(app.list.items()[0].title, "buy milk");
        assert_eq!(app.mode, Mode::Add);
    }

    #[test]
    fn esc_leaves_add_mode_and_a_returns() {
        let mut app = app_with_items(&[]);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Add);
    }

    #[test]
    fn arrows_and_vim_keys_move_focus() {
        let mut app = navigate_app(&["a", "b", "c"]);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.list.focus(), Some(0));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.list.focus(), Some(1));
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.list.focus(), Some(2));
    }

    #[test]
    fn space_and_delete_drive_bulk_delete() {
        let mut app = navigate_app(&["a", "b", "c"]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Delete);

        let titles: Vec<&str> = app.list.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["b"]);
        assert!(app.list.selection().is_empty());
        assert_eq!(app.list.focus(), None);
        assert_eq!(app.status.as_ref().map(|s| s.is_error), Some(false));
    }

    #[test]
    fn keyboard_edit_emits_one_update() {
        let mut app = navigate_app(&["old"]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Edit);
        app.after_render();

        let rev = app.list.revision();
        // First keystroke replaces the preloaded title
        type_str(&mut app, "new");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.list.items()[0].title, "new");
        assert_eq!(app.list.revision(), rev + 1);
    }

    #[test]
    fn whitespace_edit_stays_in_edit_mode() {
        let mut app = navigate_app(&["old"]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('e'));
        app.after_render();
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.list.items()[0].title, "old");
    }

    #[test]
    fn esc_cancels_edit() {
        let mut app = navigate_app(&["old"]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        app.after_render();
        type_str(&mut app, "discarded");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.editor.is_none());
        assert_eq!(app.list.items()[0].title, "old");
    }

    #[test]
    fn item_keys_toggle_and_delete() {
        let mut app = navigate_app(&["a", "b"]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.list.items()[0].priority, Priority::High);
        assert!(app.list.items()[0].is_done);

        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('d'), KeyModifiers::SHIFT),
        );
        assert_eq!(app.list.items().len(), 1);
        assert_eq!(app.list.items()[0].title, "b");
    }

    #[test]
    fn item_keys_without_focus_do_nothing() {
        let mut app = navigate_app(&["a"]);
        let rev = app.list.revision();
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.list.revision(), rev);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = navigate_app(&["a"]);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.list.focus(), None);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn q_quits_from_navigate_but_types_in_add() {
        let mut app = app_with_items(&[]);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.add_input.text(), "q");

        app.mode = Mode::Navigate;
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let mut app = app_with_items(&[]);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn paste_goes_to_active_input() {
        let mut app = app_with_items(&[]);
        handle_paste(&mut app, "line one\nline two");
        assert_eq!(app.add_input.text(), "line one line two");

        app.mode = Mode::Navigate;
        handle_paste(&mut app, "ignored");
        assert_eq!(app.add_input.text(), "line one line two");
    }

    #[test]
    fn shift_a_toggles_select_all() {
        let mut app = navigate_app(&["a", "b"]);
        press(&mut app, KeyCode::Char('A'));
        assert_eq!(app.list.selection().len(), 2);
        press(&mut app, KeyCode::Char('A'));
        assert!(app.list.selection().is_empty());
    }
}
