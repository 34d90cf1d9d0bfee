//! Console event log.
//!
//! # Architecture
//!
//! ```text
//! Interpreter            LogRing              Application
//! ───────────            ───────              ───────────
//!
//! console_log!() ─────▶ [L0][L1][L2] ──────▶ UART / defmt / RTT
//! never blocks           bounded deque        drained at leisure
//! ```
//!
//! # Rules
//!
//! - Logging never writes to the console transport
//! - Push never blocks: when the ring is full the new entry is dropped
//!   and counted
//! - Entries are stamped with the interpreter's poll tick

use core::fmt::{self, Write};

use heapless::{Deque, String};

pub use crate::config::{LOG_BUFFER_SIZE, MAX_MSG_LEN};

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Interpreter poll tick when the entry was made.
    pub tick: u32,
    pub level: LogLevel,
    /// Message, cut at `MAX_MSG_LEN` bytes.
    pub msg: String<MAX_MSG_LEN>,
}

/// Bounded log ring.
///
/// Entries above the configured level are discarded on push.
pub struct LogRing<const N: usize = LOG_BUFFER_SIZE> {
    entries: Deque<LogEntry, N>,
    level: LogLevel,
    dropped: u32,
}

impl<const N: usize> LogRing<N> {
    /// Create an empty ring logging `Info` and above.
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            level: LogLevel::Info,
            dropped: 0,
        }
    }

    /// Most verbose level still recorded.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    /// Record a formatted message.
    ///
    /// Returns `true` if queued, `false` if filtered out or dropped.
    pub fn push(&mut self, tick: u32, level: LogLevel, args: fmt::Arguments<'_>) -> bool {
        if !self.enabled(level) {
            return false;
        }
        if self.entries.is_full() {
            self.dropped = self.dropped.wrapping_add(1);
            return false;
        }

        let mut msg = String::new();
        let _ = Truncate(&mut msg).write_fmt(args);
        self.entries.push_back(LogEntry { tick, level, msg }).is_ok()
    }

    /// Take the oldest entry.
    pub fn drain(&mut self) -> Option<LogEntry> {
        self.entries.pop_front()
    }

    /// Entries lost because the ring was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Reset dropped counter (e.g., after reporting).
    pub fn reset_dropped(&mut self) {
        self.dropped = 0;
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of entries waiting to be drained.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}

impl<const N: usize> Default for LogRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Writer that silently stops at the string's capacity.
struct Truncate<'a, const M: usize>(&'a mut String<M>);

impl<const M: usize> Write for Truncate<'_, M> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Render an entry as one `[tick] LEVEL: message` line.
pub fn write_entry(entry: &LogEntry, out: &mut dyn Write) -> fmt::Result {
    write!(out, "[{:10}] {}: {}\r\n", entry.tick, entry.level.as_str(), entry.msg)
}

/// Log macro.
///
/// # Example
///
/// ```ignore
/// console_log!(LogLevel::Info, self.log, self.tick, "dispatch {}", name);
/// ```
#[macro_export]
macro_rules! console_log {
    ($level:expr, $ring:expr, $tick:expr, $($arg:tt)*) => {
        $ring.push($tick, $level, format_args!($($arg)*))
    };
}

/// Info log.
#[macro_export]
macro_rules! console_info {
    ($ring:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Info, $ring, $tick, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! console_warn {
    ($ring:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Warn, $ring, $tick, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! console_error {
    ($ring:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Error, $ring, $tick, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! console_debug {
    ($ring:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Debug, $ring, $tick, $($arg)*)
    };
}
