//! Single-line input buffer with grapheme-aware editing.
//!
//! Invariants:
//! * `caret` is a byte offset that always sits on a grapheme cluster boundary.
//! * When `selected` is set the whole text is selected: inserting replaces it,
//!   deleting clears it, caret movement drops the selection.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    text: String,
    caret: usize,
    selected: bool,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Caret byte offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Display column of the caret.
    pub fn caret_column(&self) -> usize {
        self.text[..self.caret].width()
    }

    /// Replace the content; caret moves to the end, selection dropped.
    pub fn set(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.caret = self.text.len();
        self.selected = false;
    }

    pub fn select_all(&mut self) {
        self.selected = !self.text.is_empty();
        self.caret = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.caret = 0;
        self.selected = false;
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    pub fn insert_str(&mut self, s: &str) {
        if self.selected {
            self.clear();
        }
        self.text.insert_str(self.caret, s);
        self.caret += s.len();
        // Combining marks may merge with the previous cluster; re-snap.
        self.caret = self.snap(self.caret);
    }

    pub fn backspace(&mut self) {
        if self.selected {
            self.clear();
            return;
        }
        if let Some(prev) = self.prev_boundary() {
            self.text.replace_range(prev..self.caret, "");
            self.caret = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.selected {
            self.clear();
            return;
        }
        if let Some(next) = self.next_boundary() {
            self.text.replace_range(self.caret..next, "");
        }
    }

    pub fn move_left(&mut self) {
        self.selected = false;
        if let Some(prev) = self.prev_boundary() {
            self.caret = prev;
        }
    }

    pub fn move_right(&mut self) {
        self.selected = false;
        if let Some(next) = self.next_boundary() {
            self.caret = next;
        }
    }

    pub fn move_home(&mut self) {
        self.selected = false;
        self.caret = 0;
    }

    pub fn move_end(&mut self) {
        self.selected = false;
        self.caret = self.text.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.caret]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.caret..]
            .graphemes(true)
            .next()
            .map(|g| self.caret + g.len())
    }

    fn snap(&self, byte: usize) -> usize {
        let mut last = 0;
        for (i, g) in self.text.grapheme_indices(true) {
            let end = i + g.len();
            if byte <= i {
                return i;
            }
            if byte <= end {
                return end;
            }
            last = end;
        }
        last
    }
}
