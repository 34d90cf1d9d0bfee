//! Registry and dispatcher tests

use tulip_console::cli_println;
use tulip_console::console::{Args, Command, ConsoleError, ErrorKind, Output, Registry, RegistryError};
use tulip_console::MemoryTransport;

/// Records the arguments of each invocation
#[derive(Default)]
struct Ctx {
    seen: Vec<(Option<String>, String)>,
}

struct Echo {
    name: &'static str,
    tokenize: bool,
}

impl Command<Ctx> for Echo {
    fn name(&self) -> &'static str {
        self.name
    }

    fn help(&self) -> &'static str {
        "echo arguments\nsecond help line"
    }

    fn tokenize(&self) -> bool {
        self.tokenize
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, ctx: &mut Ctx) -> Result<(), ConsoleError> {
        ctx.seen.push((args.token(1).map(String::from), args.raw().to_string()));
        cli_println!(out, "{}: {}", self.name, args.raw())
    }
}

/// Prints more than one formatted print can hold
struct Flood;

impl Command<Ctx> for Flood {
    fn name(&self) -> &'static str {
        "flood"
    }

    fn help(&self) -> &'static str {
        "print too much"
    }

    fn invoke(&self, out: &mut Output<'_>, _args: Args<'_>, _ctx: &mut Ctx) -> Result<(), ConsoleError> {
        let long = "x".repeat(300);
        cli_println!(out, "{}", long)
    }
}

static ECHO: Echo = Echo { name: "echo", tokenize: true };
static RAW: Echo = Echo { name: "raw", tokenize: false };
static HELP: Echo = Echo { name: "help", tokenize: true };
static FLOOD: Flood = Flood;

fn dispatch(registry: &Registry<'_, Ctx>, line: &str) -> (Result<(), ConsoleError>, Ctx, String) {
    let mut transport = MemoryTransport::<16, 4096>::new();
    let mut ctx = Ctx::default();
    let result = {
        let mut out = Output::new(&mut transport);
        registry.dispatch(line, &mut out, &mut ctx)
    };
    (result, ctx, transport.output_str().to_string())
}

#[test]
fn test_register_and_find() {
    let mut registry: Registry<Ctx> = Registry::new();
    assert!(registry.is_empty());
    registry.register(&ECHO).unwrap();
    registry.register(&RAW).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.find("echo").is_some());
    assert!(registry.find("ECHO").is_none());
}

#[test]
fn test_duplicate_name_rejected() {
    let mut registry: Registry<Ctx> = Registry::new();
    registry.register(&ECHO).unwrap();
    assert_eq!(registry.register(&ECHO), Err(RegistryError::DuplicateName));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_capacity_exceeded() {
    let mut registry: Registry<Ctx, 2> = Registry::new();
    registry.register(&ECHO).unwrap();
    registry.register(&RAW).unwrap();
    assert_eq!(registry.register(&FLOOD), Err(RegistryError::CapacityExceeded));
}

#[test]
fn test_invalid_names_rejected() {
    static EMPTY: Echo = Echo { name: "", tokenize: true };
    static SPACED: Echo = Echo { name: "two words", tokenize: true };

    let mut registry: Registry<Ctx> = Registry::new();
    assert_eq!(registry.register(&EMPTY), Err(RegistryError::InvalidName));
    assert_eq!(registry.register(&SPACED), Err(RegistryError::InvalidName));
}

#[test]
fn test_unknown_command_echoes_name() {
    let registry: Registry<Ctx> = Registry::new();
    let (result, _, _) = dispatch(&registry, "  bogus arg");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownCommand);
    assert_eq!(err.code(), "E01");
    assert!(err.to_string().contains("`bogus`"));
}

#[test]
fn test_blank_line_is_noop() {
    let mut registry: Registry<Ctx> = Registry::new();
    registry.register(&ECHO).unwrap();

    let (result, ctx, output) = dispatch(&registry, " \t ");
    assert!(result.is_ok());
    assert!(ctx.seen.is_empty());
    assert!(output.is_empty());
}

#[test]
fn test_tokenized_and_raw_arguments() {
    let mut registry: Registry<Ctx> = Registry::new();
    registry.register(&ECHO).unwrap();
    registry.register(&RAW).unwrap();

    let (_, ctx, _) = dispatch(&registry, "echo  a  b ");
    assert_eq!(ctx.seen, [(Some("a".to_string()), "a  b".to_string())]);

    let (_, ctx, _) = dispatch(&registry, "raw  a  b ");
    assert_eq!(ctx.seen, [(None, "a  b".to_string())]);
}

#[test]
fn test_builtin_help_lists_summaries() {
    let mut registry: Registry<Ctx> = Registry::new();
    registry.register(&ECHO).unwrap();
    registry.register(&FLOOD).unwrap();

    let (result, _, output) = dispatch(&registry, "help");
    assert!(result.is_ok());
    assert!(output.contains("echo arguments"));
    assert!(output.contains("print too much"));
    assert!(!output.contains("second help line"));

    let (_, _, output) = dispatch(&registry, "help echo");
    assert!(output.contains("second help line"));
}

#[test]
fn test_registered_help_overrides_builtin() {
    let mut registry: Registry<Ctx> = Registry::new();
    registry.register(&HELP).unwrap();

    let (result, ctx, _) = dispatch(&registry, "help me");
    assert!(result.is_ok());
    assert_eq!(ctx.seen.len(), 1);
}

#[test]
fn test_output_overflow_not_truncated() {
    let mut registry: Registry<Ctx> = Registry::new();
    registry.register(&FLOOD).unwrap();

    let (result, _, output) = dispatch(&registry, "flood");
    assert_eq!(result.unwrap_err().kind(), ErrorKind::OutputOverflow);
    assert!(!output.contains('x'));
}
