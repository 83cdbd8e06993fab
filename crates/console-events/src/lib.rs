//! Core event types shared by the input task and the console runtime.
//!
//! The runtime consumes a single bounded channel of [`Event`]s. The input
//! task is the only producer today; `Shutdown` exists so tests and future
//! producers can stop the loop without synthesizing a key press.

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// One producer (input task), one consumer (console loop). The producer awaits `send` so key
// presses are never dropped; a closed channel is the producer's signal to stop.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Top-level event enum consumed by the console event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Bracketed paste payload. Never logged verbatim; log the length only.
    Paste(String),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Interrupt (Ctrl-C) surfaced distinctly so the loop can exit without key routing.
    CtrlC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Key press without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}
