use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::TodoItem;
use crate::tui::app::App;

use super::helpers::{spans_width, truncate_to_width};
use super::input_bar::visible_window;

/// Columns before the title: cursor marker, checkbox, done mark
const PREFIX_W: usize = 8;
/// Columns after the title: gap, priority label, margin
const SUFFIX_W: usize = 11;

/// Render the item list
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let height = area.height as usize;

    if app.list.items().is_empty() {
        let line = Line::from(Span::styled(
            "  nothing to do",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    // Keep the focused row on screen
    if let Some(focus) = app.list.focus() {
        if focus < app.scroll_offset {
            app.scroll_offset = focus;
        } else if height > 0 && focus >= app.scroll_offset + height {
            app.scroll_offset = focus + 1 - height;
        }
    }
    app.scroll_offset = app
        .scroll_offset
        .min(app.list.items().len().saturating_sub(1));

    let width = area.width as usize;
    let title_w = width.saturating_sub(PREFIX_W + SUFFIX_W);
    let mut lines = Vec::with_capacity(height);
    let mut cursor = None;

    for (row, (idx, item)) in app
        .list
        .items()
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .enumerate()
    {
        let focused = app.list.focus() == Some(idx);
        let editing = app.is_editing(item.id);
        let (line, cursor_col) = item_line(app, item, focused, editing, width, title_w);
        if let Some(col) = cursor_col {
            cursor = Some(Position::new(
                area.x + col as u16,
                area.y + row as u16,
            ));
        }
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);

    if app.edit_input_focused
        && let Some(pos) = cursor
    {
        frame.set_cursor_position(pos);
    }
}

/// One list row, plus the cursor column when the row holds the edit input
fn item_line(
    app: &App,
    item: &TodoItem,
    focused: bool,
    editing: bool,
    width: usize,
    title_w: usize,
) -> (Line<'static>, Option<usize>) {
    let theme = &app.theme;
    let bg = if focused {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().fg(theme.text).bg(bg);

    let marker = if focused { "\u{25B8} " } else { "  " };
    let selected = app.list.is_selected(item.id);
    let check = if selected { "[x]" } else { "[ ]" };
    let done = if item.is_done { "\u{2713}" } else { " " };

    let mut spans = vec![
        Span::styled(marker, base.fg(theme.highlight)),
        Span::styled(
            check,
            if selected {
                base.fg(theme.checked)
            } else {
                base.fg(theme.dim)
            },
        ),
        Span::styled(" ", base),
        Span::styled(done, base.fg(theme.green)),
        Span::styled(" ", base),
    ];

    let mut cursor_col = None;
    if editing {
        let (visible, col) = visible_window(&app.edit_input, title_w);
        cursor_col = Some(PREFIX_W + col);
        spans.push(Span::styled(
            visible,
            base.fg(theme.text_bright)
                .add_modifier(Modifier::UNDERLINED),
        ));
    } else {
        let title_style = if item.is_done {
            base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
        } else if focused {
            base.fg(theme.text_bright)
        } else {
            base
        };
        spans.push(Span::styled(
            truncate_to_width(&item.title, title_w),
            title_style,
        ));
    }

    let label = item.priority.as_str();
    let used = spans_width(&spans) + label.len() + 1;
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    spans.push(Span::styled(
        label,
        base.fg(theme.priority_color(item.priority)),
    ));
    spans.push(Span::styled(" ", base));

    (Line::from(spans), cursor_col)
}
