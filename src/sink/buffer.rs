//! In-memory line buffer
//!
//! A thread-safe ring of rendered log lines. Useful for embedding a log view
//! in another program and for asserting on output in tests.

use std::collections::VecDeque;
use std::sync::RwLock;

/// Thread-safe ring buffer of rendered lines
#[derive(Debug)]
pub struct LineBuffer {
    lines: RwLock<VecDeque<String>>,
    /// Maximum lines to keep; oldest are dropped first
    max_lines: usize,
}

impl LineBuffer {
    /// Create a new buffer keeping at most `max_lines` lines
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: RwLock::new(VecDeque::with_capacity(max_lines.min(1024))),
            max_lines,
        }
    }

    /// Append rendered output, one entry per line, trailing newline stripped
    pub fn push(&self, rendered: &str) {
        if self.max_lines == 0 {
            return;
        }
        let mut lines = match self.lines.write() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        for line in rendered.lines() {
            if lines.len() >= self.max_lines {
                lines.pop_front();
            }
            lines.push_back(line.to_string());
        }
    }

    /// Get all lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .read()
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Get the number of lines in the buffer
    pub fn len(&self) -> usize {
        self.lines.read().map(|l| l.len()).unwrap_or(0)
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.write() {
            lines.clear();
        }
    }
}
