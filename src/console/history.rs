//! Command history
//!
//! Static allocation, `HISTORY_SIZE` entries of up to `LINE_SIZE` bytes,
//! newest first.

use heapless::{String, Vec};

use crate::config::{HISTORY_SIZE, LINE_SIZE};

/// Command history, most recent entry at index 0
pub struct History {
    entries: Vec<String<LINE_SIZE>, HISTORY_SIZE>,
    /// Current navigation position (0 = newest)
    nav_pos: Option<usize>,
}

impl History {
    /// Create empty history
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            nav_pos: None,
        }
    }

    /// Push a new command into history
    ///
    /// Blank lines are ignored. A line already present moves to the front;
    /// the oldest entry is evicted when full.
    pub fn push(&mut self, line: &str) {
        self.nav_pos = None;
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let mut entry = String::new();
        if entry.push_str(line).is_err() {
            return;
        }

        if let Some(idx) = self.entries.iter().position(|e| e.as_str() == line) {
            self.entries.remove(idx);
        } else if self.entries.is_full() {
            self.entries.pop();
        }
        let _ = self.entries.insert(0, entry);
    }

    /// Get previous (older) command
    pub fn get_prev(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        let pos = match self.nav_pos {
            None => 0,
            Some(p) if p + 1 < self.entries.len() => p + 1,
            Some(p) => p,
        };

        self.nav_pos = Some(pos);
        self.get(pos)
    }

    /// Get next (newer) command, `None` when back at the input line
    pub fn get_next(&mut self) -> Option<&str> {
        match self.nav_pos {
            None => None,
            Some(0) => {
                self.nav_pos = None;
                None
            }
            Some(p) => {
                self.nav_pos = Some(p - 1);
                self.get(p - 1)
            }
        }
    }

    /// Reset navigation (call when user types)
    pub fn reset_nav(&mut self) {
        self.nav_pos = None;
    }

    /// Entry by age (0 = newest)
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(|e| e.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
