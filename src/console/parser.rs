//! Command line parser
//!
//! Whitespace is the only delimiter: no quoting, no escaping.
//! Arguments are never copied, [`Args`] is a view into the submitted line.

/// Split a line into its command name and the trimmed remainder
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.find(char::is_whitespace) {
        Some(end) => (&line[..end], line[end..].trim_start()),
        None => (line, ""),
    }
}

/// Arguments passed to a command handler
///
/// With tokenizing enabled, [`Args::token`] gives 1-indexed access to the
/// whitespace-separated words. Tokens are located on demand, nothing past
/// the requested index is scanned. With tokenizing disabled only the raw
/// remainder is exposed and every token lookup is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Args<'a> {
    raw: &'a str,
    tokenized: bool,
}

impl<'a> Args<'a> {
    pub fn new(raw: &'a str, tokenized: bool) -> Self {
        Self { raw: raw.trim(), tokenized }
    }

    /// Get token by position (1-based). Absent past the last token.
    pub fn token(&self, n: usize) -> Option<&'a str> {
        if !self.tokenized || n == 0 {
            return None;
        }
        self.raw.split_whitespace().nth(n - 1)
    }

    /// Raw remainder starting at token `n` (1-based), trailing space trimmed
    pub fn rest(&self, n: usize) -> Option<&'a str> {
        if !self.tokenized || n == 0 {
            return None;
        }
        let mut s = self.raw;
        for _ in 1..n {
            let start = s.find(|c: char| !c.is_whitespace())?;
            s = &s[start..];
            let end = s.find(char::is_whitespace)?;
            s = &s[end..];
        }
        let s = s.trim();
        if s.is_empty() { None } else { Some(s) }
    }

    /// Number of tokens (0 when tokenizing is disabled)
    pub fn count(&self) -> usize {
        if self.tokenized {
            self.raw.split_whitespace().count()
        } else {
            0
        }
    }

    /// The trimmed argument text exactly as typed
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_tokenized(&self) -> bool {
        self.tokenized
    }
}
