use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::helpers::truncate_to_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = if let Some(status) = &app.status {
        let color = if status.is_error {
            app.theme.red
        } else {
            app.theme.green
        };
        Line::from(Span::styled(
            truncate_to_width(&format!(" {}", status.text), width),
            Style::default().fg(color).bg(bg),
        ))
    } else if app.show_key_hints {
        Line::from(Span::styled(
            truncate_to_width(key_hints(app.mode), width),
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        Line::from(Span::styled(" ".repeat(width), Style::default().bg(bg)))
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn key_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigate => {
            " jk move  space select  del delete selected  enter edit  p priority  x done  a add  ? help  q quit"
        }
        Mode::Add => " enter add  esc list",
        Mode::Edit => " enter save  esc cancel",
    }
}
