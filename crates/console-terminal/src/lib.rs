//! Terminal side of the line console.
//!
//! The console runs in the alternate screen with raw mode on, so the output
//! pane and input row own the whole window while it is open. Bracketed paste
//! is enabled for the session: a multi-line paste arrives as one
//! `InputEvent::Paste` and is flattened into the single input line, instead
//! of each pasted newline submitting a command.

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;
use tracing::debug;

pub mod layout;
pub mod render;
pub mod surface;
pub mod writer;

pub use render::{FrameView, render_frame};
pub use surface::{ScrollAnchor, TerminalSurface};
pub use writer::Writer;

pub trait TerminalBackend {
    /// Switch the terminal into console mode. Idempotent.
    fn enter(&mut self) -> Result<()>;
    /// Restore the terminal the console found. Idempotent.
    fn leave(&mut self) -> Result<()>;
}

#[derive(Default)]
pub struct CrosstermBackend {
    entered: bool,
    title: Option<String>,
}

/// Leaves console mode on drop, including on early return or panic unwind.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Window title written when the console session starts.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard { backend: self })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, EnableBracketedPaste)?;
        if let Some(title) = &self.title {
            execute!(out, SetTitle(title))?;
        }
        self.entered = true;
        debug!(
            target: "terminal",
            titled = self.title.is_some(),
            "console_session_entered"
        );
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        // Paste mode goes first; the primary screen must not keep it.
        execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        self.entered = false;
        debug!(target: "terminal", "console_session_left");
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}
