//! Line console core: history recall, command dispatch and output formatting,
//! independent of any rendering backend.

pub mod command;
pub mod controller;
pub mod document;
pub mod history;
pub mod input_line;
pub mod notice;
pub mod output;
pub mod surface;

pub use command::{CommandParser, Invocation, ParsedCommand, start_notices};
pub use controller::{ConsoleSettings, DEFAULT_TRACE_SOURCE, Direction, KeyOutcome, LineConsole};
pub use document::{Run, StyledDocument};
pub use history::{DEFAULT_RECENT_USED_MAXIMUM, HistoryBuffer};
pub use input_line::InputLine;
pub use notice::{NOTICE_TITLE, Notice, NoticeQueue, NoticeSink};
pub use output::{OutputLine, ParseColorError, Printer, Rgb};
pub use surface::{DisplaySurface, MemorySurface, ScrollPosition, SurfaceError};
