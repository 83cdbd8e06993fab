//! Submitted-line history with bounded recall.
//!
//! Storage grows without a cap; only navigation is bounded to the most recent
//! `depth` entries. The cursor is an offset from the newest entry:
//! `0 <= cursor < min(depth, len)`. Recall saturates at both ends, it never wraps.

/// Default number of recent entries reachable through recall.
pub const DEFAULT_RECENT_USED_MAXIMUM: usize = 10;

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: Vec<String>,
    cursor: usize,
    depth: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_RECENT_USED_MAXIMUM)
    }

    /// A depth of zero is treated as one (the newest entry stays reachable).
    pub fn with_depth(depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            depth: depth.max(1),
        }
    }

    /// Append a submitted line and reset the recall cursor.
    pub fn record(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
        self.cursor = 0;
    }

    /// Step one entry further into the past. Returns `None` on an empty buffer.
    pub fn recall_older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        if self.cursor + 1 < self.depth && self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Step one entry toward the newest. Returns `None` on an empty buffer.
    pub fn recall_newer(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    fn current(&self) -> Option<&str> {
        let idx = self.entries.len().checked_sub(1 + self.cursor)?;
        self.entries.get(idx).map(String::as_str)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }
}
