//! Wraps a styled document into screen rows.
//!
//! Rows break on `\n` and whenever the next grapheme would exceed the width.
//! A trailing newline does not produce an extra empty row. Wide graphemes
//! that cannot fit on a row at all (width 1 with a double-width cluster) are
//! still placed, one per row.

use console_core::{Rgb, StyledDocument};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub segments: Vec<(String, Rgb)>,
    pub width: usize,
}

impl Row {
    fn push(&mut self, g: &str, w: usize, color: Rgb) {
        match self.segments.last_mut() {
            Some((text, c)) if *c == color => text.push_str(g),
            _ => self.segments.push((g.to_string(), color)),
        }
        self.width += w;
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|(t, _)| t.as_str()).collect()
    }
}

pub fn layout_rows(doc: &StyledDocument, width: u16) -> Vec<Row> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut current = Row::default();
    let mut ends_with_newline = false;
    for run in doc.runs() {
        for g in run.text.graphemes(true) {
            if g == "\n" || g == "\r\n" {
                rows.push(std::mem::take(&mut current));
                ends_with_newline = true;
                continue;
            }
            ends_with_newline = false;
            let w = g.width();
            if current.width + w > width && current.width > 0 {
                rows.push(std::mem::take(&mut current));
            }
            current.push(g, w, run.color);
        }
    }
    if !ends_with_newline && (current.width > 0 || !current.segments.is_empty()) {
        rows.push(current);
    }
    rows
}
