//! Modal notices raised by commands.
//!
//! A notice is acknowledge-to-dismiss. The console only pushes; the front end
//! decides how to present the queue and pops entries as the user acknowledges
//! them, preserving order.

use std::collections::VecDeque;

pub const NOTICE_TITLE: &str = "Message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: String,
}

pub trait NoticeSink {
    fn show_notice(&mut self, message: &str);
}

#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notice currently awaiting acknowledgement.
    pub fn front(&self) -> Option<&Notice> {
        self.pending.front()
    }

    pub fn acknowledge(&mut self) -> Option<Notice> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(|n| n.message.as_str())
    }
}

impl NoticeSink for NoticeQueue {
    fn show_notice(&mut self, message: &str) {
        tracing::debug!(target: "console.notice", len = message.len(), queued = self.pending.len() + 1, "notice_queued");
        self.pending.push_back(Notice {
            title: NOTICE_TITLE,
            message: message.to_string(),
        });
    }
}
