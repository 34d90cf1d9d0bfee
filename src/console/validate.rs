//! Argument validators shared by the command handlers
//!
//! Keyword tables are scanned in declared order and the first exact match
//! wins. A match yields an opcode equal to the 1-based table position.

use super::error::{ConsoleError, Range};

/// Ordered keyword table mapping sub-command names to values
pub struct Keywords<T: 'static> {
    entries: &'static [(&'static str, T)],
}

impl<T: Copy> Keywords<T> {
    pub const fn new(entries: &'static [(&'static str, T)]) -> Self {
        Self { entries }
    }

    /// First exact, case-sensitive match with its opcode
    pub fn find(&self, token: &str) -> Option<(u8, T)> {
        self.entries
            .iter()
            .position(|(name, _)| *name == token)
            .map(|i| ((i + 1) as u8, self.entries[i].1))
    }

    /// Opcode of a token, if it names a keyword
    pub fn opcode(&self, token: &str) -> Option<u8> {
        self.find(token).map(|(op, _)| op)
    }

    /// Value for an opcode
    pub fn get(&self, opcode: u8) -> Option<T> {
        let idx = (opcode as usize).checked_sub(1)?;
        self.entries.get(idx).map(|(_, v)| *v)
    }
}

/// Resolve a single keyword or fail with `UnknownSubArgument`
pub fn keyword<T: Copy>(command: &'static str, set: &Keywords<T>, token: &str) -> Result<T, ConsoleError> {
    set.find(token)
        .map(|(_, v)| v)
        .ok_or_else(|| ConsoleError::unknown_sub(command, token))
}

/// Result of [`keyword_or_decimal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    Keyword(T),
    Number(i64),
}

/// Keyword with a decimal fallback
///
/// Returns the opcode (keyword position, or value + `offset`) and the choice.
pub fn keyword_or_decimal<T: Copy>(
    command: &'static str,
    set: &Keywords<T>,
    token: &str,
    range: Range,
    offset: u8,
) -> Result<(u8, Choice<T>), ConsoleError> {
    if let Some((op, v)) = set.find(token) {
        return Ok((op, Choice::Keyword(v)));
    }
    let value = decimal_in_range(command, token, range)?;
    let opcode = u8::try_from(value)
        .ok()
        .and_then(|v| v.checked_add(offset))
        .ok_or_else(|| ConsoleError::out_of_range(command, token, range))?;
    Ok((opcode, Choice::Number(value)))
}

/// Parse hex with an optional `0x` prefix
pub fn parse_hex(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || digits.starts_with('+') {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Parse a signed decimal integer
pub fn parse_decimal(token: &str) -> Option<i64> {
    token.parse::<i32>().ok().map(i64::from)
}

/// Hex value within an inclusive range
pub fn hex_in_range(command: &'static str, token: &str, range: Range) -> Result<u32, ConsoleError> {
    match parse_hex(token) {
        Some(v) if range.contains(v as i64) => Ok(v),
        _ => Err(ConsoleError::out_of_range(command, token, range)),
    }
}

/// Decimal value within an inclusive range
pub fn decimal_in_range(command: &'static str, token: &str, range: Range) -> Result<i64, ConsoleError> {
    match parse_decimal(token) {
        Some(v) if range.contains(v) => Ok(v),
        _ => Err(ConsoleError::out_of_range(command, token, range)),
    }
}

/// Rule in a combination disallow table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disallow {
    /// Two tokens resolving to the same opcode
    SameOpcode,
    /// This opcode pair, in either order
    Pair(u8, u8),
}

impl Disallow {
    fn rejects(&self, a: u8, b: u8) -> bool {
        match *self {
            Disallow::SameOpcode => a == b,
            Disallow::Pair(x, y) => (a, b) == (x, y) || (a, b) == (y, x),
        }
    }
}

/// Resolve several optional tokens against one keyword set and check the
/// result against a disallow table
///
/// Absent tokens stay `None`. A present token outside the set is
/// `UnknownSubArgument`; a disallowed pair is `InvalidCombination`.
pub fn combination<T: Copy, const K: usize>(
    command: &'static str,
    set: &Keywords<T>,
    tokens: [Option<&str>; K],
    disallow: &[Disallow],
    usage: &'static str,
) -> Result<[Option<T>; K], ConsoleError> {
    let mut opcodes = [None; K];
    let mut values = [None; K];
    for (i, token) in tokens.iter().enumerate() {
        if let Some(token) = token {
            let (op, v) = set
                .find(token)
                .ok_or_else(|| ConsoleError::unknown_sub(command, token))?;
            opcodes[i] = Some(op);
            values[i] = Some(v);
        }
    }

    for i in 0..K {
        for j in (i + 1)..K {
            if let (Some(a), Some(b)) = (opcodes[i], opcodes[j]) {
                if disallow.iter().any(|rule| rule.rejects(a, b)) {
                    return Err(ConsoleError::InvalidCombination { command, usage });
                }
            }
        }
    }

    Ok(values)
}

/// First argument of a command that takes either a keyword or a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject<'a, T> {
    Absent,
    Keyword(T),
    Name(&'a str),
}

/// Classify a token as keyword or free name (filename, path)
pub fn subject<'a, T: Copy>(set: &Keywords<T>, token: Option<&'a str>) -> Subject<'a, T> {
    match token {
        None => Subject::Absent,
        Some(t) => match set.find(t) {
            Some((_, v)) => Subject::Keyword(v),
            None => Subject::Name(t),
        },
    }
}
