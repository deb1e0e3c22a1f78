use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

use super::*;

pub(super) fn handle_add(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_add(),
        KeyCode::Esc | KeyCode::Tab => app.mode = Mode::Navigate,
        _ => {
            edit_text(&mut app.add_input, key);
        }
    }
}

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        _ => {
            edit_text(&mut app.edit_input, key);
        }
    }
}
