//! Interpreter integrating all console components
//!
//! Lazy polling from the firmware's main loop - no dedicated task.
//! Every call to [`Interpreter::poll`] does a bounded amount of work and
//! never waits for input.

use heapless::String;

use crate::cli_println;
use crate::config::{ConsoleConfig, BINDING_COUNT, LINE_SIZE, VERSION};
use crate::device::Device;
use crate::logging::LogRing;
use crate::transport::Transport;
use crate::{console_debug, console_info, console_warn};

use super::connection::{ConnectionMonitor, Transition};
use super::error::ConsoleError;
use super::history::History;
use super::line_buffer::LineBuffer;
use super::output::Output;
use super::registry::Registry;

const BELL: u8 = 0x07;
const BACKSPACE: u8 = 0x08;

/// Escape sequence state
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum EscapeState {
    Normal,
    /// Got ESC
    Escape,
    /// Inside ESC [ or ESC O, until the final byte
    Csi {
        /// First parameter byte
        first: u8,
        /// Parameter and intermediate bytes seen
        len: u8,
    },
}

/// Console state machine
pub struct Interpreter<'r, C: ?Sized, const N: usize = BINDING_COUNT> {
    registry: Registry<'r, C, N>,
    config: ConsoleConfig,
    line: LineBuffer,
    history: History,
    escape_state: EscapeState,
    /// Previous byte was CR, a following LF is swallowed
    last_cr: bool,
    /// Line submitted by the last byte, dispatched in the same poll
    submitted: Option<String<LINE_SIZE>>,
    connection: ConnectionMonitor,
    log: LogRing,
    tick: u32,
}

impl<'r, C: ?Sized, const N: usize> Interpreter<'r, C, N> {
    /// Create an interpreter. The registry is frozen from here on.
    pub fn new(registry: Registry<'r, C, N>, config: ConsoleConfig) -> Self {
        Self {
            registry,
            config,
            line: LineBuffer::new(),
            history: History::new(),
            escape_state: EscapeState::Normal,
            last_cr: false,
            submitted: None,
            connection: ConnectionMonitor::new(),
            log: LogRing::new(),
            tick: 0,
        }
    }

    pub fn registry(&self) -> &Registry<'r, C, N> {
        &self.registry
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Text typed so far on the current line
    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Number of polls so far, the log timestamp
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Event log, drained by the application
    pub fn log_mut(&mut self) -> &mut LogRing {
        &mut self.log
    }

    /// Print the prompt
    pub fn print_prompt(&self, out: &mut Output<'_>) {
        out.write_text(self.config.prompt);
    }

    /// Execute one line as if it had been typed, then print the prompt
    ///
    /// A failure is reported as one line on the console and also returned.
    pub fn execute(&mut self, line: &str, out: &mut Output<'_>, ctx: &mut C) -> Result<(), ConsoleError> {
        console_debug!(self.log, self.tick, "dispatch: {}", line);
        let result = self.registry.dispatch(line, out, ctx);
        if let Err(err) = &result {
            console_warn!(self.log, self.tick, "{}", err);
            let _ = cli_println!(out, "{}", err);
        }
        self.print_prompt(out);
        result
    }

    /// Process a single input byte
    ///
    /// A completed line is stored for dispatch, it is not executed here.
    pub fn process_byte(&mut self, byte: u8, out: &mut Output<'_>) {
        let after_cr = core::mem::replace(&mut self.last_cr, byte == b'\r');
        match self.escape_state {
            EscapeState::Normal => self.process_normal(byte, after_cr, out),
            EscapeState::Escape => {
                if byte == b'[' || byte == b'O' {
                    self.escape_state = EscapeState::Csi { first: 0, len: 0 };
                } else {
                    // Lone ESC, the byte is ordinary input
                    self.escape_state = EscapeState::Normal;
                    self.process_normal(byte, after_cr, out);
                }
            }
            EscapeState::Csi { first, len } => match byte {
                // Parameter and intermediate bytes
                0x20..=0x3F => {
                    let first = if len == 0 { byte } else { first };
                    self.escape_state = EscapeState::Csi { first, len: len.saturating_add(1) };
                }
                // Final byte
                0x40..=0x7E => {
                    self.escape_state = EscapeState::Normal;
                    self.handle_sequence(first, len, byte, out);
                }
                // Control byte aborts the sequence
                _ => {
                    self.escape_state = EscapeState::Normal;
                    self.process_normal(byte, after_cr, out);
                }
            },
        }
    }

    /// Act on a complete escape sequence. Unknown keys are ignored.
    fn handle_sequence(&mut self, first: u8, len: u8, last: u8, out: &mut Output<'_>) {
        match (len, first, last) {
            (0, _, b'A') => self.handle_up(out),
            (0, _, b'B') => self.handle_down(out),
            (0, _, b'C') => self.handle_right(out),
            (0, _, b'D') => self.handle_left(out),
            (0, _, b'H') => self.handle_home(out),
            (0, _, b'F') => self.handle_end(out),
            (1, b'1' | b'7', b'~') => self.handle_home(out),
            (1, b'4' | b'8', b'~') => self.handle_end(out),
            (1, b'3', b'~') => self.handle_delete(out),
            _ => {}
        }
    }

    fn process_normal(&mut self, byte: u8, after_cr: bool, out: &mut Output<'_>) {
        match byte {
            // CR LF is one line ending
            b'\n' if after_cr => {}

            // Enter
            b'\r' | b'\n' => self.submit(out),

            // Backspace
            0x7F | BACKSPACE => {
                if self.line.backspace() {
                    self.echo(out, &[BACKSPACE]);
                    self.redraw_tail(out, 1);
                }
                self.history.reset_nav();
            }

            // Escape
            0x1B => self.escape_state = EscapeState::Escape,

            // Ctrl+C
            0x03 => {
                self.echo(out, b"^C\r\n");
                self.line.clear();
                self.history.reset_nav();
                self.print_prompt(out);
            }

            // Ctrl+U (clear line)
            0x15 => {
                self.erase_line(out);
                self.history.reset_nav();
            }

            // Printable character
            0x20..=0x7E => {
                if self.line.insert(byte) {
                    self.echo(out, &[byte]);
                    self.redraw_tail(out, 0);
                } else {
                    out.write_byte(BELL);
                    console_warn!(self.log, self.tick, "line full, dropped 0x{:02x}", byte);
                }
                self.history.reset_nav();
            }

            _ => {}
        }
    }

    fn submit(&mut self, out: &mut Output<'_>) {
        self.echo(out, b"\r\n");
        let line = self.line.as_str().trim();
        if line.is_empty() {
            self.line.clear();
            self.print_prompt(out);
            return;
        }

        self.history.push(line);
        let mut submitted = String::new();
        // line.len() <= LINE_SIZE
        let _ = submitted.push_str(line);
        self.submitted = Some(submitted);
        self.line.clear();
    }

    fn handle_up(&mut self, out: &mut Output<'_>) {
        let mut entry: String<LINE_SIZE> = String::new();
        if let Some(prev) = self.history.get_prev() {
            let _ = entry.push_str(prev);
            self.replace_line(&entry, out);
        }
    }

    fn handle_down(&mut self, out: &mut Output<'_>) {
        let mut entry: String<LINE_SIZE> = String::new();
        if let Some(next) = self.history.get_next() {
            let _ = entry.push_str(next);
        }
        // Empty entry: back at a fresh line
        self.replace_line(&entry, out);
    }

    fn handle_left(&mut self, out: &mut Output<'_>) {
        if self.line.move_left() {
            self.echo(out, &[BACKSPACE]);
        }
    }

    fn handle_right(&mut self, out: &mut Output<'_>) {
        if let Some(&c) = self.line.tail().first() {
            self.line.move_right();
            self.echo(out, &[c]);
        }
    }

    fn handle_home(&mut self, out: &mut Output<'_>) {
        let moved = self.line.home();
        for _ in 0..moved {
            self.echo(out, &[BACKSPACE]);
        }
    }

    fn handle_end(&mut self, out: &mut Output<'_>) {
        if self.config.echo {
            out.write_raw(self.line.tail());
        }
        self.line.end();
    }

    fn handle_delete(&mut self, out: &mut Output<'_>) {
        if self.line.delete() {
            self.redraw_tail(out, 1);
        }
    }

    /// Rewrite the text right of the cursor, blanking `erased` cells
    /// past its end, and put the terminal cursor back
    fn redraw_tail(&self, out: &mut Output<'_>, erased: usize) {
        if !self.config.echo {
            return;
        }
        let tail = self.line.tail();
        if tail.is_empty() && erased == 0 {
            return;
        }
        out.write_raw(tail);
        for _ in 0..erased {
            out.write_byte(b' ');
        }
        for _ in 0..tail.len() + erased {
            out.write_byte(BACKSPACE);
        }
    }

    fn erase_line(&mut self, out: &mut Output<'_>) {
        self.handle_end(out);
        for _ in 0..self.line.len() {
            self.echo(out, b"\x08 \x08");
        }
        self.line.clear();
    }

    fn replace_line(&mut self, new_line: &str, out: &mut Output<'_>) {
        self.erase_line(out);
        self.line.set(new_line);
        self.echo(out, new_line.as_bytes());
    }

    fn echo(&self, out: &mut Output<'_>, bytes: &[u8]) {
        if self.config.echo {
            out.write_raw(bytes);
        }
    }

    /// Forget any half-typed input
    fn reset_input(&mut self) {
        self.line.clear();
        self.history.reset_nav();
        self.escape_state = EscapeState::Normal;
        self.last_cr = false;
        self.submitted = None;
    }
}

impl<'r, C: Device + ?Sized, const N: usize> Interpreter<'r, C, N> {
    /// One run-loop step
    ///
    /// In order: connection edge check, read at most one byte, service the
    /// transport, dispatch the line that byte completed. Returns the
    /// dispatch result when a line was executed.
    pub fn poll<T: Transport>(&mut self, transport: &mut T, ctx: &mut C) -> Option<Result<(), ConsoleError>> {
        self.tick = self.tick.wrapping_add(1);

        let connected = transport.is_connected();
        let edge = self.connection.update(connected);
        if edge == Some(Transition::Disconnected) {
            console_info!(self.log, self.tick, "host disconnected");
            self.reset_input();
        }
        if !connected {
            transport.service();
            return None;
        }

        let byte = if transport.byte_available() {
            Some(transport.read_byte())
        } else {
            None
        };

        let mut out = Output::new(transport);
        if edge == Some(Transition::Connected) {
            console_info!(self.log, self.tick, "host connected");
            self.print_welcome(&mut out, ctx);
        }
        if let Some(byte) = byte {
            self.process_byte(byte, &mut out);
        }
        out.service();

        let line = self.submitted.take()?;
        Some(self.execute(&line, &mut out, ctx))
    }

    /// Print welcome banner, status report and prompt
    pub fn print_welcome(&mut self, out: &mut Output<'_>, ctx: &mut C) {
        let _ = cli_println!(out);
        let _ = cli_println!(out, "{} v{}", self.config.banner, VERSION);
        let _ = cli_println!(out, "Type 'help' for commands.");
        if let Err(err) = ctx.status(out) {
            let _ = cli_println!(out, "{}", err);
        }
        self.print_prompt(out);
    }
}
