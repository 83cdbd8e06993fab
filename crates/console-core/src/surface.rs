//! Display surface contract plus an in-memory implementation.

use crate::document::StyledDocument;
use crate::output::Rgb;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("document position {offset} out of range (length {len})")]
    OutOfRange { offset: usize, len: usize },
}

/// Append-only rendered output region. The console writes into it and never
/// reads it back.
pub trait DisplaySurface {
    fn append(&mut self, text: &str, color: Rgb) -> Result<(), SurfaceError>;
    fn clear_all(&mut self) -> Result<(), SurfaceError>;
    fn scroll_to_end(&mut self);
    fn scroll_to_start(&mut self);
}

impl<T: DisplaySurface + ?Sized> DisplaySurface for &mut T {
    fn append(&mut self, text: &str, color: Rgb) -> Result<(), SurfaceError> {
        (**self).append(text, color)
    }
    fn clear_all(&mut self) -> Result<(), SurfaceError> {
        (**self).clear_all()
    }
    fn scroll_to_end(&mut self) {
        (**self).scroll_to_end()
    }
    fn scroll_to_start(&mut self) {
        (**self).scroll_to_start()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPosition {
    #[default]
    Start,
    End,
}

/// Surface that only records content; used headless and in tests.
#[derive(Debug, Default)]
pub struct MemorySurface {
    document: StyledDocument,
    position: ScrollPosition,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &StyledDocument {
        &self.document
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    /// Complete lines written so far (a trailing partial line is included).
    pub fn lines(&self) -> Vec<String> {
        let text = self.document.text();
        if text.is_empty() {
            return Vec::new();
        }
        let body = text.strip_suffix('\n').unwrap_or(&text);
        body.split('\n').map(str::to_string).collect()
    }

    pub fn position(&self) -> ScrollPosition {
        self.position
    }
}

impl DisplaySurface for MemorySurface {
    fn append(&mut self, text: &str, color: Rgb) -> Result<(), SurfaceError> {
        self.document.append(text, color)
    }

    fn clear_all(&mut self) -> Result<(), SurfaceError> {
        let len = self.document.len();
        self.document.remove(0, len)?;
        self.position = ScrollPosition::Start;
        Ok(())
    }

    fn scroll_to_end(&mut self) {
        self.position = ScrollPosition::End;
    }

    fn scroll_to_start(&mut self) {
        self.position = ScrollPosition::Start;
    }
}
