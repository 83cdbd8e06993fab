//! Display surface drawn into the terminal's output area.
//!
//! Holds the styled document plus a scroll anchor. `Bottom` follows new
//! output; `Line(n)` pins row `n` (after wrapping) to the top of the viewport.
//! The anchor is resolved against the current layout at draw time, so a
//! resize never leaves it pointing past the end.

use crate::layout::{Row, layout_rows};
use console_core::{DisplaySurface, Rgb, StyledDocument, SurfaceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAnchor {
    Bottom,
    Line(usize),
}

#[derive(Debug)]
pub struct TerminalSurface {
    document: StyledDocument,
    anchor: ScrollAnchor,
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            document: StyledDocument::new(),
            anchor: ScrollAnchor::Bottom,
        }
    }

    pub fn document(&self) -> &StyledDocument {
        &self.document
    }

    pub fn anchor(&self) -> ScrollAnchor {
        self.anchor
    }

    fn first_row(&self, total: usize, height: usize) -> usize {
        let max_first = total.saturating_sub(height);
        match self.anchor {
            ScrollAnchor::Bottom => max_first,
            ScrollAnchor::Line(n) => n.min(max_first),
        }
    }

    /// Rows visible in a `width` x `height` viewport.
    pub fn visible_rows(&self, width: u16, height: u16) -> Vec<Row> {
        let rows = layout_rows(&self.document, width);
        let height = usize::from(height);
        let first = self.first_row(rows.len(), height);
        rows.into_iter().skip(first).take(height).collect()
    }

    pub fn page_up(&mut self, width: u16, height: u16) {
        let total = layout_rows(&self.document, width).len();
        let height = usize::from(height.max(1));
        let first = self.first_row(total, height);
        self.anchor = ScrollAnchor::Line(first.saturating_sub(height));
    }

    pub fn page_down(&mut self, width: u16, height: u16) {
        let total = layout_rows(&self.document, width).len();
        let height = usize::from(height.max(1));
        let max_first = total.saturating_sub(height);
        let next = self.first_row(total, height) + height;
        self.anchor = if next >= max_first {
            ScrollAnchor::Bottom
        } else {
            ScrollAnchor::Line(next)
        };
    }
}

impl DisplaySurface for TerminalSurface {
    fn append(&mut self, text: &str, color: Rgb) -> Result<(), SurfaceError> {
        self.document.append(text, color)
    }

    fn clear_all(&mut self) -> Result<(), SurfaceError> {
        let len = self.document.len();
        self.document.remove(0, len)?;
        self.anchor = ScrollAnchor::Line(0);
        Ok(())
    }

    fn scroll_to_end(&mut self) {
        self.anchor = ScrollAnchor::Bottom;
    }

    fn scroll_to_start(&mut self) {
        self.anchor = ScrollAnchor::Line(0);
    }
}
