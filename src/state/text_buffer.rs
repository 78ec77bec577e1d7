/// Single-line editable text with a cursor, used by the dialog inputs.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    /// Byte offset into `text`, always on a char boundary.
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace the whole content, cursor moving to the end.
    pub fn set(&mut self, s: &str) {
        self.text = s.to_string();
        self.cursor = self.text.len();
    }

    /// Char-based cursor position, for rendering.
    pub fn cursor_char_index(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
    }

    /// Ctrl+W: drop trailing whitespace, then the word before the cursor.
    pub fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end();
        let word_start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.text.drain(word_start..self.cursor);
        self.cursor = word_start;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_erasing() {
        let mut buf = TextBuffer::new();
        for c in "git@".chars() {
            buf.insert_char(c);
        }
        assert_eq!(buf.text(), "git@");
        buf.delete_back();
        assert_eq!(buf.text(), "git");
        assert_eq!(buf.cursor_char_index(), 3);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut buf = TextBuffer::new();
        buf.set("a/c");
        buf.move_left();
        buf.insert_char('b');
        assert_eq!(buf.text(), "a/bc");
        assert_eq!(buf.cursor_char_index(), 3);
    }

    #[test]
    fn set_places_cursor_at_end() {
        let mut buf = TextBuffer::new();
        buf.set("/home/me/src/cargo");
        assert_eq!(buf.cursor_char_index(), 18);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.cursor_char_index(), 0);
    }

    #[test]
    fn word_delete_stops_at_separators() {
        let mut buf = TextBuffer::new();
        buf.set("clone this url");
        buf.delete_word_back();
        assert_eq!(buf.text(), "clone this ");
        buf.delete_word_back();
        assert_eq!(buf.text(), "clone ");
    }

    #[test]
    fn cursor_movement_respects_multibyte_chars() {
        let mut buf = TextBuffer::new();
        buf.insert_char('ü');
        buf.insert_char('x');
        buf.move_left();
        buf.move_left();
        assert_eq!(buf.cursor_char_index(), 0);
        buf.move_right();
        assert_eq!(buf.cursor_char_index(), 1);
        buf.move_end();
        buf.delete_back();
        assert_eq!(buf.text(), "ü");
    }

    #[test]
    fn edge_operations_are_no_ops() {
        let mut buf = TextBuffer::new();
        buf.delete_back();
        buf.delete_word_back();
        buf.move_left();
        buf.move_right();
        assert_eq!(buf.text(), "");
        buf.move_home();
        assert_eq!(buf.cursor_char_index(), 0);
    }
}
