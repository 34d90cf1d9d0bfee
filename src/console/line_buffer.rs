//! Line buffer for console input

use crate::config::LINE_SIZE;

/// Line input buffer with an editing cursor
///
/// Holds printable ASCII only, so byte positions and columns coincide.
pub struct LineBuffer {
    buf: [u8; LINE_SIZE],
    len: usize,
    cursor: usize,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_SIZE],
            len: 0,
            cursor: 0,
        }
    }

    /// Insert a character at the cursor
    ///
    /// Returns `false` (buffer unchanged) when the line is full.
    pub fn insert(&mut self, c: u8) -> bool {
        if self.len >= LINE_SIZE {
            return false;
        }
        self.buf.copy_within(self.cursor..self.len, self.cursor + 1);
        self.buf[self.cursor] = c;
        self.len += 1;
        self.cursor += 1;
        true
    }

    /// Remove the character before the cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.buf.copy_within(self.cursor..self.len, self.cursor - 1);
        self.cursor -= 1;
        self.len -= 1;
        true
    }

    /// Remove the character under the cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len {
            return false;
        }
        self.buf.copy_within(self.cursor + 1..self.len, self.cursor);
        self.len -= 1;
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.len {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move cursor to start, returning how far it moved
    pub fn home(&mut self) -> usize {
        let moved = self.cursor;
        self.cursor = 0;
        moved
    }

    /// Move cursor to end, returning how far it moved
    pub fn end(&mut self) -> usize {
        let moved = self.len - self.cursor;
        self.cursor = self.len;
        moved
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
        self.cursor = 0;
    }

    /// Replace contents, cursor at end. Returns `false` if `s` was too long.
    pub fn set(&mut self, s: &str) -> bool {
        let bytes = s.as_bytes();
        if bytes.len() > LINE_SIZE {
            return false;
        }
        self.buf[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len();
        self.cursor = self.len;
        true
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Text from the cursor to the end
    pub fn tail(&self) -> &[u8] {
        &self.buf[self.cursor..self.len]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= LINE_SIZE
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
