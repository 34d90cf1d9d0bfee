//! # tulip-console
//!
//! Command console of the TULIP4041 firmware.
//!
//! ## Architecture
//!
//! All operator interaction flows through [`Interpreter::poll`]:
//! - [`Transport`] carries bytes, the console never blocks on it
//! - The line editor echoes keystrokes and submits complete lines
//! - The [`Registry`] maps the first word to a [`Command`]
//! - Commands validate their arguments and call into the [`Device`]
//!
//! Nothing is allocated at runtime; every buffer is a `heapless` container
//! sized in [`config`].

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod device;
pub mod logging;
pub mod transport;

pub use config::ConsoleConfig;
pub use console::{register_builtins, Args, Command, ConsoleError, ErrorKind, Interpreter, Output, Registry, RegistryError};
pub use device::Device;
pub use logging::{LogEntry, LogLevel, LogRing};
pub use transport::{MemoryTransport, Transport};
