use ratatui::text::Span;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Terminal columns taken by `s`
pub(super) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| display_width(&s.content)).sum()
}

/// Cut `s` to at most `max` columns, ending in an ellipsis when cut.
pub(super) fn truncate_to_width(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut width = 0;
    for g in s.graphemes(true) {
        let w = display_width(g);
        if width + w > max - 1 {
            break;
        }
        out.push_str(g);
        width += w;
    }
    out.push('\u{2026}');
    out
}
