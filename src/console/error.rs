//! Console error types

use core::fmt;

use crate::config::TOKEN_ECHO_LEN;

/// Offending token, copied so the error outlives the input line
pub type Token = heapless::String<TOKEN_ECHO_LEN>;

/// Error category with a stable code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// E01: Unknown command
    UnknownCommand,
    /// E02: Unknown sub-command or keyword
    UnknownSubArgument,
    /// E03: Numeric value unparsable or out of range
    OutOfRange,
    /// E04: Argument combination not supported
    InvalidCombination,
    /// E05: Missing required argument
    MissingArg,
    /// E06: Formatted output exceeds the print buffer
    OutputOverflow,
}

impl ErrorKind {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::UnknownSubArgument => "E02",
            Self::OutOfRange => "E03",
            Self::InvalidCombination => "E04",
            Self::MissingArg => "E05",
            Self::OutputOverflow => "E06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::UnknownSubArgument => "unknown sub-command",
            Self::OutOfRange => "invalid value",
            Self::InvalidCombination => "argument combination not supported",
            Self::MissingArg => "missing argument",
            Self::OutputOverflow => "output line too long",
        }
    }
}

/// Radix a numeric argument is parsed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Hex,
}

/// Inclusive numeric range accepted by a validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub lo: i64,
    pub hi: i64,
    pub radix: Radix,
}

impl Range {
    pub const fn decimal(lo: i64, hi: i64) -> Self {
        Self { lo, hi, radix: Radix::Decimal }
    }

    pub const fn hex(lo: i64, hi: i64) -> Self {
        Self { lo, hi, radix: Radix::Hex }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radix {
            Radix::Decimal => write!(f, "{}..{}", self.lo, self.hi),
            Radix::Hex => write!(f, "{:X}..{:X} (hex)", self.lo, self.hi),
        }
    }
}

/// Error reported for a single dispatch
///
/// Every variant renders as exactly one human-readable line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    UnknownCommand { name: Token },
    UnknownSubArgument { command: &'static str, token: Token },
    OutOfRange { command: &'static str, token: Token, expected: Range },
    InvalidCombination { command: &'static str, usage: &'static str },
    MissingArg { command: &'static str, usage: &'static str },
    OutputOverflow,
}

impl ConsoleError {
    pub fn unknown_command(name: &str) -> Self {
        Self::UnknownCommand { name: echo(name) }
    }

    pub fn unknown_sub(command: &'static str, token: &str) -> Self {
        Self::UnknownSubArgument { command, token: echo(token) }
    }

    pub fn out_of_range(command: &'static str, token: &str, expected: Range) -> Self {
        Self::OutOfRange { command, token: echo(token), expected }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            Self::UnknownSubArgument { .. } => ErrorKind::UnknownSubArgument,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::InvalidCombination { .. } => ErrorKind::InvalidCombination,
            Self::MissingArg { .. } => ErrorKind::MissingArg,
            Self::OutputOverflow => ErrorKind::OutputOverflow,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code();
        match self {
            Self::UnknownCommand { name } => {
                write!(f, "{}: unknown command `{}`, type help for a list", code, name)
            }
            Self::UnknownSubArgument { command, token } => {
                write!(f, "{}: {}: unknown sub-command `{}`, see help {}", code, command, token, command)
            }
            Self::OutOfRange { command, token, expected } => {
                write!(f, "{}: {}: invalid value `{}`, expected {}", code, command, token, expected)
            }
            Self::InvalidCombination { command, usage } => {
                write!(f, "{}: {}: argument combination not supported, use: {}", code, command, usage)
            }
            Self::MissingArg { command, usage } => {
                write!(f, "{}: {}: missing argument, use: {}", code, command, usage)
            }
            Self::OutputOverflow => write!(f, "{}: {}", code, ErrorKind::OutputOverflow.message()),
        }
    }
}

/// Copy a token for echoing, cut at a char boundary if it is too long
fn echo(token: &str) -> Token {
    let mut out = Token::new();
    for c in token.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Registration failure, only possible while the registry is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// A command with this name is already registered
    DuplicateName,
    /// The registry holds its maximum number of bindings
    CapacityExceeded,
    /// Name is empty or contains whitespace
    InvalidName,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DuplicateName => "duplicate command name",
            Self::CapacityExceeded => "command registry full",
            Self::InvalidName => "invalid command name",
        })
    }
}
