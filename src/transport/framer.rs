use std::collections::VecDeque;

use crate::config::MAX_LINE_LEN;

/// Splits a received byte stream into lines.
///
/// `\n` ends a line and `\r` is dropped. Bytes past `max_len` on one line are
/// discarded, and empty lines are skipped.
#[derive(Debug)]
pub struct LineFramer {
    partial: Vec<u8>,
    lines: VecDeque<String>,
    max_len: usize,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            partial: Vec::with_capacity(max_len),
            lines: VecDeque::new(),
            max_len,
        }
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            match b {
                b'\r' => {}
                b'\n' => {
                    if !self.partial.is_empty() {
                        let line = String::from_utf8_lossy(&self.partial).into_owned();
                        self.lines.push_back(line);
                        self.partial.clear();
                    }
                }
                _ if self.partial.len() < self.max_len => self.partial.push(b),
                _ => {}
            }
        }
    }

    pub fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    /// True when a complete line is waiting.
    pub fn has_line(&self) -> bool {
        !self.lines.is_empty()
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}
