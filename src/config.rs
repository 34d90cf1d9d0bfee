//! Module: config
//!
//! Purpose: Sizing and presentation settings for the console.
//!
//! Architecture:
//! - Buffer sizes are compile-time constants: every buffer is static,
//!   nothing is allocated at runtime
//! - Presentation (prompt, banner, echo) is a runtime `ConsoleConfig`
//!   chosen by the embedding firmware at startup
//! - Hardware variants are Cargo features (`module` adds the RTC)

/// Maximum length of one input line in bytes
pub const LINE_SIZE: usize = 128;

/// Number of remembered input lines
pub const HISTORY_SIZE: usize = 8;

/// Maximum number of command bindings
pub const BINDING_COUNT: usize = 32;

/// Size of the scoped buffer used by one formatted print
pub const PRINT_BUFFER_SIZE: usize = 256;

/// Longest token echoed back in an error message
pub const TOKEN_ECHO_LEN: usize = LINE_SIZE;

/// Number of buffered log entries
pub const LOG_BUFFER_SIZE: usize = 32;

/// Maximum log message length
pub const MAX_MSG_LEN: usize = 96;

/// Address reported to storage operations by older firmware when none was given
pub const NO_ADDRESS_SENTINEL: u32 = 0x4041_4243;

/// Version string shown in the banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runtime console presentation
#[derive(Debug, Clone, Copy)]
pub struct ConsoleConfig {
    /// Prompt printed before each input line
    pub prompt: &'static str,
    /// First line of the welcome shown on every new connection
    pub banner: &'static str,
    /// Echo accepted keystrokes back to the terminal
    pub echo: bool,
}

impl ConsoleConfig {
    pub const DEFAULT: Self = Self {
        prompt: "TULIP> ",
        banner: "TULIP4041 console",
        echo: true,
    };
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Resolve an optional storage address the way older firmware expects it
pub fn address_or_sentinel(addr: Option<u32>) -> u32 {
    addr.unwrap_or(NO_ADDRESS_SENTINEL)
}
