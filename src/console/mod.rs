//! Line-oriented command console
//!
//! Lazy polling from the firmware loop - no dedicated task.
//! Zero heap allocation - all static buffers.

pub mod commands;
pub mod connection;
pub mod error;
pub mod history;
pub mod interpreter;
pub mod line_buffer;
pub mod output;
pub mod parser;
pub mod registry;
pub mod validate;

pub use commands::register_builtins;
pub use connection::{ConnectionMonitor, Transition};
pub use error::{ConsoleError, ErrorKind, Radix, Range, RegistryError, Token};
pub use history::History;
pub use interpreter::Interpreter;
pub use line_buffer::LineBuffer;
pub use output::{Output, CLEAR_SCREEN};
pub use parser::{split_command, Args};
pub use registry::{Command, Registry};
pub use validate::{Choice, Disallow, Keywords, Subject};
