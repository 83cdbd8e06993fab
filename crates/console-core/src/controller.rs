//! Line console controller: input line, history recall and command dispatch.
//!
//! The controller owns the input line and history exclusively. It writes to
//! the injected [`DisplaySurface`] and raises notices through the injected
//! [`NoticeSink`]; it never reads surface content back. Surface failures are
//! logged and the failing operation is abandoned; the console stays usable.

use crate::command::{CommandParser, ParsedCommand, start_notices};
use crate::history::{DEFAULT_RECENT_USED_MAXIMUM, HistoryBuffer};
use crate::input_line::InputLine;
use crate::notice::NoticeSink;
use crate::output::{Printer, Rgb};
use crate::surface::{DisplaySurface, SurfaceError};
use console_events::{KeyCode, KeyEvent};
use tracing::{debug, error, trace};

pub const DEFAULT_TRACE_SOURCE: &str = "LineConsole";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Older,
    Newer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleSettings {
    pub history_depth: usize,
    /// Trace flag applied to echoed lines.
    pub trace: bool,
    pub trace_source: String,
    pub foreground: Rgb,
    /// Write each submitted line (plus a blank line) before dispatching it.
    pub echo_input: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_RECENT_USED_MAXIMUM,
            trace: false,
            trace_source: DEFAULT_TRACE_SOURCE.to_string(),
            foreground: Rgb::WHITE,
            echo_input: false,
        }
    }
}

pub struct LineConsole<S: DisplaySurface, N: NoticeSink> {
    surface: S,
    notices: N,
    history: HistoryBuffer,
    input: InputLine,
    printer: Printer,
    trace: bool,
    echo_input: bool,
}

impl<S: DisplaySurface, N: NoticeSink> LineConsole<S, N> {
    pub fn new(surface: S, notices: N, settings: ConsoleSettings) -> Self {
        Self {
            surface,
            notices,
            history: HistoryBuffer::with_depth(settings.history_depth),
            input: InputLine::new(),
            printer: Printer::new(settings.trace_source, settings.foreground),
            trace: settings.trace,
            echo_input: settings.echo_input,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn notices(&self) -> &N {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut N {
        &mut self.notices
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    /// Submit whatever the input line currently holds.
    pub fn submit(&mut self) {
        let line = self.input.as_str().to_string();
        self.submit_line(&line);
    }

    /// Record, dispatch and scroll. Empty lines are ignored entirely.
    pub fn submit_line(&mut self, line: &str) {
        if line.is_empty() {
            trace!(target: "console.submit", "empty_submit_skipped");
            return;
        }
        self.history.record(line);
        if self.echo_input {
            let res = self
                .printer
                .println(&mut self.surface, &format!("{line}\n"), false);
            self.report(res, "echo_input");
        }
        let command = CommandParser::parse(line);
        debug!(
            target: "console.submit",
            len = line.len(),
            command = command.kind(),
            history_len = self.history.len(),
            "line_submitted"
        );
        self.execute(command);
        self.surface.scroll_to_end();
        self.input.set(line);
        self.input.select_all();
    }

    /// Recall navigation. Does nothing while the history is empty.
    pub fn navigate(&mut self, direction: Direction) {
        let recalled = match direction {
            Direction::Older => self.history.recall_older(),
            Direction::Newer => self.history.recall_newer(),
        };
        if let Some(line) = recalled {
            self.input.set(line);
            trace!(target: "console.history", ?direction, cursor = self.history.cursor(), "recall");
        }
    }

    pub fn execute(&mut self, command: ParsedCommand) {
        match command {
            ParsedCommand::Clear => {
                let res = self.printer.clear_all(&mut self.surface);
                self.report(res, "clear");
            }
            ParsedCommand::Start { args } => {
                for message in start_notices(&args) {
                    self.notices.show_notice(&message);
                }
            }
            ParsedCommand::Echo(text) => {
                let res = self.printer.println(&mut self.surface, &text, self.trace);
                self.report(res, "echo");
            }
        }
    }

    /// Insert pasted text; line breaks and tabs become spaces, other control
    /// characters are dropped, same as typed keys.
    pub fn paste(&mut self, text: &str) {
        let flat: String = text
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if matches!(c, '\n' | '\t') { ' ' } else { c })
            .filter(|c| !c.is_control())
            .collect();
        trace!(target: "console.input", len = flat.len(), "paste_insert");
        self.input.insert_str(&flat);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Up => self.navigate(Direction::Older),
            KeyCode::Down => self.navigate(Direction::Newer),
            KeyCode::Home if key.ctrl() => self.surface.scroll_to_start(),
            KeyCode::End if key.ctrl() => self.surface.scroll_to_end(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Char(c) if !key.ctrl() && !c.is_control() => self.input.insert_char(c),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Consumed
    }

    fn report(&self, res: Result<(), SurfaceError>, op: &'static str) {
        if let Err(err) = res {
            error!(target: "console.surface", op, %err, "surface_update_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeQueue;
    use crate::surface::MemorySurface;
    use console_events::KeyModifiers;

    fn console() -> LineConsole<MemorySurface, NoticeQueue> {
        LineConsole::new(
            MemorySurface::new(),
            NoticeQueue::new(),
            ConsoleSettings::default(),
        )
    }

    fn type_line(c: &mut LineConsole<MemorySurface, NoticeQueue>, s: &str) {
        for ch in s.chars() {
            c.handle_key(KeyEvent::plain(KeyCode::Char(ch)));
        }
        c.handle_key(KeyEvent::plain(KeyCode::Enter));
    }

    #[test]
    fn empty_submit_is_skipped() {
        let mut c = console();
        c.handle_key(KeyEvent::plain(KeyCode::Enter));
        assert!(c.history().is_empty());
        assert!(c.surface().text().is_empty());
    }

    #[test]
    fn typed_line_replaces_selected_previous() {
        let mut c = console();
        type_line(&mut c, "one");
        assert!(c.input().is_selected());
        type_line(&mut c, "two");
        assert_eq!(c.surface().lines(), vec!["one".to_string(), "two".to_string()]);
        assert_eq!(c.input().as_str(), "two");
    }

    #[test]
    fn navigate_on_empty_history_keeps_input() {
        let mut c = console();
        c.handle_key(KeyEvent::plain(KeyCode::Char('x')));
        c.navigate(Direction::Older);
        c.navigate(Direction::Newer);
        assert_eq!(c.input().as_str(), "x");
    }

    #[test]
    fn ctrl_home_end_scroll_surface() {
        use crate::surface::ScrollPosition;
        let mut c = console();
        type_line(&mut c, "hi");
        assert_eq!(c.surface().position(), ScrollPosition::End);
        c.handle_key(KeyEvent::new(KeyCode::Home, KeyModifiers::CTRL));
        assert_eq!(c.surface().position(), ScrollPosition::Start);
        c.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::CTRL));
        assert_eq!(c.surface().position(), ScrollPosition::End);
    }

    #[test]
    fn ctrl_chars_are_ignored() {
        let mut c = console();
        let outcome = c.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CTRL));
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert!(c.input().is_empty());
        assert_eq!(c.handle_key(KeyEvent::plain(KeyCode::Esc)), KeyOutcome::Ignored);
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut c = console();
        c.paste("a\r\nb\nc");
        assert_eq!(c.input().as_str(), "a b c");
    }

    #[test]
    fn paste_drops_control_characters() {
        let mut c = console();
        c.paste("hi\x1b[2J\x07\tthere");
        assert_eq!(c.input().as_str(), "hi[2J there");
        c.submit();
        assert_eq!(c.surface().text(), "hi[2J there\n");
        assert!(!c.surface().text().contains(['\x1b', '\x07', '\t']));
    }

    #[test]
    fn echo_input_writes_transcript() {
        let settings = ConsoleSettings {
            echo_input: true,
            ..ConsoleSettings::default()
        };
        let mut c = LineConsole::new(MemorySurface::new(), NoticeQueue::new(), settings);
        c.submit_line("hello");
        assert_eq!(c.surface().text(), "hello\n\nhello\n");
    }

    #[test]
    fn trace_setting_prefixes_echo() {
        let settings = ConsoleSettings {
            trace: true,
            trace_source: "Src".into(),
            ..ConsoleSettings::default()
        };
        let mut c = LineConsole::new(MemorySurface::new(), NoticeQueue::new(), settings);
        c.submit_line("hello");
        assert_eq!(c.surface().text(), "Src->hello\n");
    }
}
