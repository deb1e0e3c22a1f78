use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::app::{App, Mode};
use crate::tui::text_input::TextInput;

/// Render the add-item input
pub fn render_input_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let active = app.mode == Mode::Add;
    let border_color = if active {
        app.theme.highlight
    } else {
        app.theme.dim
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" New item ")
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (visible, cursor_col) = visible_window(&app.add_input, inner.width as usize);
    let line = Line::from(Span::styled(
        visible,
        Style::default().fg(app.theme.text_bright).bg(bg),
    ));
    frame.render_widget(Paragraph::new(line), inner);

    if active && inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position(Position::new(inner.x + cursor_col as u16, inner.y));
    }
}

/// Slice of the input that fits in `width` columns with the cursor visible,
/// plus the cursor's column within that slice.
pub(super) fn visible_window(input: &TextInput, width: usize) -> (String, usize) {
    let text = input.text();
    let cursor_col = input.cursor_col();
    if width == 0 {
        return (String::new(), 0);
    }
    // Keep one column free for the cursor at the end
    let skip = (cursor_col + 1).saturating_sub(width);

    // A wide char straddling `skip` is dropped whole, so the slice may
    // start one column later
    let mut out = String::new();
    let mut start = None;
    let mut col = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if col >= skip {
            let first = *start.get_or_insert(col);
            if col + w > first + width {
                break;
            }
            out.push(c);
        }
        col += w;
    }
    let start = start.unwrap_or(skip);
    (out, cursor_col.saturating_sub(start))
}
