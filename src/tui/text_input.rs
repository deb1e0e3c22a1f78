use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Single-line text input with a grapheme-aware cursor.
///
/// `all_selected` mirrors a focused input whose text is fully selected:
/// the next insertion replaces everything, the next deletion clears it,
/// and any cursor movement drops the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    /// Byte offset, always on a grapheme boundary
    cursor: usize,
    all_selected: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input holding `text` with the cursor at the end
    pub fn with_text(text: &str) -> Self {
        TextInput {
            buffer: text.to_string(),
            cursor: text.len(),
            all_selected: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn select_all(&mut self) {
        self.all_selected = !self.buffer.is_empty();
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.all_selected = false;
    }

    /// Terminal column of the cursor relative to the start of the text
    pub fn cursor_col(&self) -> usize {
        UnicodeWidthStr::width(&self.buffer[..self.cursor])
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    /// Insert at the cursor. Newlines become spaces.
    pub fn insert_str(&mut self, s: &str) {
        if self.all_selected {
            self.clear();
        }
        let clean = s.replace(['\n', '\r'], " ");
        self.buffer.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if self.all_selected {
            self.clear();
            return;
        }
        if let Some(prev) = self.prev_boundary() {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.all_selected {
            self.clear();
            return;
        }
        if let Some(next) = self.next_boundary() {
            self.buffer.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        self.all_selected = false;
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        self.all_selected = false;
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.all_selected = false;
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.all_selected = false;
        self.cursor = self.buffer.len();
    }

    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor + g.len())
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
    }
}
