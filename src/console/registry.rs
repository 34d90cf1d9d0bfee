//! Command registry and dispatcher

use heapless::Vec;

use crate::cli_println;
use crate::config::BINDING_COUNT;

use super::error::{ConsoleError, RegistryError};
use super::output::Output;
use super::parser::{split_command, Args};

/// A console command
///
/// `C` is the context handed to every invocation, usually the firmware's
/// [`Device`](crate::device::Device). Handlers run to completion on the
/// console loop; a long operation must call [`Output::service`] itself.
pub trait Command<C: ?Sized> {
    /// Name typed at the prompt. Unique, non-empty, no whitespace.
    fn name(&self) -> &'static str;

    /// Help text. The first line doubles as the summary in `help`.
    fn help(&self) -> &'static str;

    /// Split arguments into tokens (`true`) or pass the raw remainder
    fn tokenize(&self) -> bool {
        true
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, ctx: &mut C) -> Result<(), ConsoleError>;
}

/// Name-to-command bindings, in registration order
///
/// Built once at startup. The interpreter takes it by value, after which
/// no further registration is possible.
pub struct Registry<'r, C: ?Sized, const N: usize = BINDING_COUNT> {
    bindings: Vec<&'r dyn Command<C>, N>,
}

impl<'r, C: ?Sized, const N: usize> Registry<'r, C, N> {
    pub const fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Add a binding
    pub fn register(&mut self, command: &'r dyn Command<C>) -> Result<(), RegistryError> {
        let name = command.name();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(RegistryError::InvalidName);
        }
        if self.find(name).is_some() {
            return Err(RegistryError::DuplicateName);
        }
        self.bindings
            .push(command)
            .map_err(|_| RegistryError::CapacityExceeded)
    }

    /// Exact, case-sensitive lookup
    pub fn find(&self, name: &str) -> Option<&'r dyn Command<C>> {
        self.bindings.iter().copied().find(|c| c.name() == name)
    }

    /// All command names for listing
    pub fn command_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.iter().map(|c| c.name())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Execute one submitted line
    ///
    /// A blank line does nothing. `help` is answered here unless a command
    /// of that name was registered.
    pub fn dispatch(&self, line: &str, out: &mut Output<'_>, ctx: &mut C) -> Result<(), ConsoleError> {
        let (name, rest) = split_command(line);
        if name.is_empty() {
            return Ok(());
        }

        let Some(command) = self.find(name) else {
            if name == "help" {
                return self.help(Args::new(rest, true), out);
            }
            return Err(ConsoleError::unknown_command(name));
        };

        command.invoke(out, Args::new(rest, command.tokenize()), ctx)
    }

    fn help(&self, args: Args<'_>, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        if let Some(name) = args.token(1) {
            let command = self
                .find(name)
                .ok_or_else(|| ConsoleError::unknown_command(name))?;
            for line in command.help().lines() {
                cli_println!(out, "{}", line)?;
            }
            return Ok(());
        }

        cli_println!(out, "Available commands:")?;
        for command in self.bindings.iter() {
            let summary = command.help().lines().next().unwrap_or("");
            cli_println!(out, "  {:<10} {}", command.name(), summary)?;
        }
        Ok(())
    }
}

impl<'r, C: ?Sized, const N: usize> Default for Registry<'r, C, N> {
    fn default() -> Self {
        Self::new()
    }
}
