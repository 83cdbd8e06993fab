//! Batched terminal writer.
//!
//! A frame is assembled as an ordered list of primitive commands and flushed
//! once. Positions are absolute with a (0,0) origin; callers keep them in
//! bounds. The writer is short-lived, one per frame.

use anyhow::Result;
use console_core::Rgb;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    Print(String),
    Fg(Rgb),
    Reverse,
    Reset,
    ShowCursor,
    HideCursor,
}

#[derive(Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn fg(&mut self, color: Rgb) {
        self.cmds.push(Command::Fg(color));
    }
    pub fn reverse(&mut self) {
        self.cmds.push(Command::Reverse);
    }
    pub fn reset(&mut self) {
        self.cmds.push(Command::Reset);
    }
    pub fn show_cursor(&mut self, visible: bool) {
        self.cmds.push(if visible {
            Command::ShowCursor
        } else {
            Command::HideCursor
        });
    }

    /// Concatenated printed text, in order. Mostly useful for assertions.
    pub fn printed(&self) -> String {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Command::Print(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn flush(self) -> Result<()> {
        self.flush_to(&mut stdout())
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                // Caller guarantees a preceding MoveTo(0, y).
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Fg(c) => queue!(
                    out,
                    SetForegroundColor(Color::Rgb {
                        r: c.r,
                        g: c.g,
                        b: c.b
                    })
                )?,
                Command::Reverse => queue!(out, SetAttribute(Attribute::Reverse))?,
                Command::Reset => queue!(out, SetAttribute(Attribute::Reset), ResetColor)?,
                Command::ShowCursor => queue!(out, Show)?,
                Command::HideCursor => queue!(out, Hide)?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prints_skipped() {
        let mut w = Writer::new();
        w.print("");
        w.print("x");
        assert_eq!(w.commands(), &[Command::Print("x".into())]);
    }

    #[test]
    fn flush_emits_text_and_sequences() {
        let mut w = Writer::new();
        w.move_to(0, 1);
        w.clear_line();
        w.fg(Rgb::new(1, 2, 3));
        w.print("hello");
        w.reset();
        let mut out: Vec<u8> = Vec::new();
        w.flush_to(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("hello"));
        assert!(s.contains("\x1b[2;1H"));
        assert!(s.contains("38;2;1;2;3"));
    }
}
