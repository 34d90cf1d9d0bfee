//! Output formatter
//!
//! All console output funnels through [`Output`]. A formatted print is
//! rendered into one scoped `heapless::String` first, so an oversized line
//! fails with `OutputOverflow` instead of reaching the terminal truncated.
//! The transport is serviced before every print so long reports keep the
//! USB link alive.

use core::fmt;

use crate::config::PRINT_BUFFER_SIZE;
use crate::transport::Transport;

use super::ConsoleError;

/// Terminal sequence that clears the screen
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Output handle given to the line editor, the dispatcher and every handler
pub struct Output<'t> {
    transport: &'t mut dyn Transport,
}

impl<'t> Output<'t> {
    pub fn new(transport: &'t mut dyn Transport) -> Self {
        Self { transport }
    }

    /// Pump the transport
    ///
    /// Handlers running a long operation call this periodically.
    pub fn service(&mut self) {
        self.transport.service();
    }

    /// Formatted print without a line ending
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> Result<(), ConsoleError> {
        let mut buf: heapless::String<PRINT_BUFFER_SIZE> = heapless::String::new();
        fmt::write(&mut buf, args).map_err(|_| ConsoleError::OutputOverflow)?;
        self.transport.service();
        self.write_text(&buf);
        Ok(())
    }

    /// Formatted print followed by `\r\n`
    pub fn println(&mut self, args: fmt::Arguments<'_>) -> Result<(), ConsoleError> {
        self.print(args)?;
        self.transport.write_bytes(b"\r\n");
        Ok(())
    }

    /// Write text, expanding bare `\n` to `\r\n`
    pub fn write_text(&mut self, text: &str) {
        let mut prev = 0u8;
        for &b in text.as_bytes() {
            if b == b'\n' && prev != b'\r' {
                self.transport.write_byte(b'\r');
            }
            self.transport.write_byte(b);
            prev = b;
        }
    }

    /// Write raw bytes (echo, control sequences)
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.transport.write_bytes(bytes);
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.transport.write_byte(byte);
    }
}

impl fmt::Write for Output<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s);
        Ok(())
    }
}

/// Formatted print through an [`Output`], without a line ending
#[macro_export]
macro_rules! cli_print {
    ($out:expr, $($arg:tt)*) => {
        $out.print(format_args!($($arg)*))
    };
}

/// Formatted print through an [`Output`], ending the line
#[macro_export]
macro_rules! cli_println {
    ($out:expr) => {
        $out.println(format_args!(""))
    };
    ($out:expr, $($arg:tt)*) => {
        $out.println(format_args!($($arg)*))
    };
}
