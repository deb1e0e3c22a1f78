use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::list::NavKey;
use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match key.code {
        // List protocol
        KeyCode::Up | KeyCode::Char('k') => app.nav(NavKey::Up),
        KeyCode::Down | KeyCode::Char('j') => app.nav(NavKey::Down),
        KeyCode::Char(' ') => app.nav(NavKey::Space),
        KeyCode::Delete => app.nav(NavKey::Delete),

        // Focused item
        KeyCode::Enter | KeyCode::Char('e') => app.begin_edit_focused(),
        KeyCode::Char('p') => app.toggle_priority_focused(),
        KeyCode::Char('x') => app.toggle_done_focused(),
        KeyCode::Char('D') => app.delete_focused(),

        KeyCode::Char('A') => {
            let all = !app.list.items().is_empty()
                && app.list.selection().len() == app.list.items().len();
            app.select_all(!all);
        }
        KeyCode::Char('a') | KeyCode::Tab => app.mode = Mode::Add,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}
