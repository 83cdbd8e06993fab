//! Styled text document backing a display surface.
//!
//! Content is a list of coloured runs. Offsets and lengths count `char`s, not
//! bytes. Adjacent runs sharing a colour are merged so that repeated appends in
//! one colour do not grow the run list.

use crate::output::Rgb;
use crate::surface::SurfaceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, Default)]
pub struct StyledDocument {
    runs: Vec<Run>,
    len: usize,
}

impl StyledDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn insert(&mut self, offset: usize, text: &str, color: Rgb) -> Result<(), SurfaceError> {
        if offset > self.len {
            return Err(SurfaceError::OutOfRange {
                offset,
                len: self.len,
            });
        }
        if text.is_empty() {
            return Ok(());
        }
        let added = text.chars().count();
        let (idx, split_at) = self.locate(offset);
        let run = Run {
            text: text.to_string(),
            color,
        };
        match idx {
            None => self.runs.push(run),
            Some(i) if split_at == 0 => self.runs.insert(i, run),
            Some(i) => {
                let tail_text = split_off_chars(&mut self.runs[i].text, split_at);
                let tail = Run {
                    text: tail_text,
                    color: self.runs[i].color,
                };
                self.runs.insert(i + 1, run);
                self.runs.insert(i + 2, tail);
            }
        }
        self.len += added;
        self.coalesce();
        Ok(())
    }

    pub fn append(&mut self, text: &str, color: Rgb) -> Result<(), SurfaceError> {
        self.insert(self.len, text, color)
    }

    pub fn remove(&mut self, offset: usize, count: usize) -> Result<(), SurfaceError> {
        let end = offset.checked_add(count).filter(|end| *end <= self.len);
        let Some(end) = end else {
            return Err(SurfaceError::OutOfRange {
                offset,
                len: self.len,
            });
        };
        let mut pos = 0;
        for run in &mut self.runs {
            let run_len = run.text.chars().count();
            let run_start = pos;
            let run_end = pos + run_len;
            pos = run_end;
            if run_end <= offset || run_start >= end {
                continue;
            }
            let from = offset.saturating_sub(run_start);
            let to = end.min(run_end) - run_start;
            run.text = run
                .text
                .chars()
                .enumerate()
                .filter(|(i, _)| *i < from || *i >= to)
                .map(|(_, c)| c)
                .collect();
        }
        self.runs.retain(|r| !r.text.is_empty());
        self.len -= count;
        self.coalesce();
        Ok(())
    }

    // Run index and char offset inside it; `None` when the offset is the end.
    fn locate(&self, offset: usize) -> (Option<usize>, usize) {
        let mut pos = 0;
        for (i, run) in self.runs.iter().enumerate() {
            let run_len = run.text.chars().count();
            if offset < pos + run_len {
                return (Some(i), offset - pos);
            }
            pos += run_len;
        }
        (None, 0)
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.color == run.color => prev.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

fn split_off_chars(s: &mut String, at_char: usize) -> String {
    let byte = s
        .char_indices()
        .nth(at_char)
        .map(|(b, _)| b)
        .unwrap_or(s.len());
    s.split_off(byte)
}
