use console_core::{
    ConsoleSettings, Direction, DisplaySurface, LineConsole, MemorySurface, NoticeQueue, Rgb,
    SurfaceError,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

fn console() -> LineConsole<MemorySurface, NoticeQueue> {
    LineConsole::new(
        MemorySurface::new(),
        NoticeQueue::new(),
        ConsoleSettings::default(),
    )
}

#[test]
fn submission_becomes_latest_history_entry() {
    let mut c = console();
    c.submit_line("first");
    c.navigate(Direction::Older);
    c.submit_line("second");
    assert_eq!(c.history().latest(), Some("second"));
    assert_eq!(c.history().cursor(), 0);
}

#[test]
fn recall_steps_back_through_submissions() {
    let mut c = console();
    for line in ["a", "b", "c", "d"] {
        c.submit_line(line);
    }
    c.navigate(Direction::Older);
    assert_eq!(c.input().as_str(), "c");
    c.navigate(Direction::Older);
    c.navigate(Direction::Older);
    assert_eq!(c.input().as_str(), "a");
    c.navigate(Direction::Older);
    assert_eq!(c.input().as_str(), "a");
}

#[test]
fn older_then_newer_restores_input() {
    let mut c = console();
    c.submit_line("x");
    c.submit_line("y");
    let before = c.input().as_str().to_string();
    c.navigate(Direction::Older);
    assert_eq!(c.input().as_str(), "x");
    c.navigate(Direction::Newer);
    assert_eq!(c.input().as_str(), before);
}

#[test]
fn recall_reaches_at_most_ten_entries_back() {
    let mut c = console();
    for i in 1..=30 {
        c.submit_line(&format!("line {i}"));
    }
    for _ in 0..50 {
        c.navigate(Direction::Older);
    }
    assert_eq!(c.history().cursor(), 9);
    assert_eq!(c.input().as_str(), "line 21");
    for _ in 0..50 {
        c.navigate(Direction::Newer);
    }
    assert_eq!(c.history().cursor(), 0);
    assert_eq!(c.input().as_str(), "line 30");
}

#[test]
fn clear_empties_surface() {
    let mut c = console();
    c.submit_line("some text");
    c.submit_line("more text");
    assert!(!c.surface().text().is_empty());
    c.submit_line("CLEAR");
    assert!(c.surface().text().is_empty());
    assert_eq!(c.history().latest(), Some("CLEAR"));
}

#[test]
fn start_raises_cumulative_notices() {
    let mut c = console();
    c.submit_line("start a b c");
    let messages: Vec<&str> = c.notices().messages().collect();
    assert_eq!(messages, vec!["a ", "a b ", "a b c"]);
    assert!(c.surface().text().is_empty());
}

#[test]
fn unknown_line_echoed_once() {
    let mut c = console();
    c.submit_line("hello world");
    assert_eq!(c.surface().lines(), vec!["hello world".to_string()]);
    assert!(c.notices().is_empty());
}

struct FailingSurface {
    appended: usize,
}

impl DisplaySurface for FailingSurface {
    fn append(&mut self, _text: &str, _color: Rgb) -> Result<(), SurfaceError> {
        self.appended += 1;
        Err(SurfaceError::OutOfRange { offset: 7, len: 0 })
    }
    fn clear_all(&mut self) -> Result<(), SurfaceError> {
        Err(SurfaceError::OutOfRange { offset: 0, len: 3 })
    }
    fn scroll_to_end(&mut self) {}
    fn scroll_to_start(&mut self) {}
}

#[derive(Clone, Default)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl std::io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn surface_failures_are_logged_and_console_stays_usable() {
    let writer = BufferWriter::default();
    let buffer = writer.inner.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .with_writer(writer)
        .finish();

    let mut c = LineConsole::new(
        FailingSurface { appended: 0 },
        NoticeQueue::new(),
        ConsoleSettings::default(),
    );
    with_default(subscriber, || {
        c.submit_line("echo me");
        c.submit_line("clear");
        c.submit_line("again");
    });

    assert_eq!(c.surface().appended, 2);
    assert_eq!(c.history().len(), 3);
    let log = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    assert!(log.contains("console.surface"));
    assert!(log.contains("surface_update_failed"));
    assert!(log.contains("op=\"clear\"") || log.contains("op=clear"));
}
