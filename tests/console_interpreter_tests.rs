//! Interpreter tests: run loop, line editing, connection lifecycle

use tulip_console::cli_println;
use tulip_console::config::{ConsoleConfig, LINE_SIZE};
use tulip_console::console::{register_builtins, ConsoleError, ErrorKind, Interpreter, Output, Registry};
use tulip_console::device::{
    Device, EmulateOp, ImportRequest, ListFilter, PlugRequest, PrinterOp, RtcOp, SdCardOp,
    StorageOp, SystemOp, TracerOp, XmemOp,
};
use tulip_console::logging::LogLevel;
use tulip_console::MemoryTransport;

type Transport = MemoryTransport<512, 16384>;

const PROMPT: &str = "TULIP> ";

#[test]
fn test_disconnected_only_services() {
    let (mut console, mut transport, mut dev) = setup();
    transport.feed(b"cat\r");

    for _ in 0..3 {
        assert!(console.poll(&mut transport, &mut dev).is_none());
    }
    assert_eq!(transport.services(), 3);
    assert_eq!(transport.pending(), 4);
    assert!(transport.output().is_empty());
    assert!(dev.calls.is_empty());
}

#[test]
fn test_welcome_on_connect() {
    let (mut console, mut transport, mut dev) = setup();
    transport.set_connected(true);

    assert!(console.poll(&mut transport, &mut dev).is_none());
    let output = transport.output_str();
    assert!(output.contains("TULIP4041 console"));
    assert!(output.contains("STATUS OK"));
    assert!(output.ends_with(PROMPT));
    assert_eq!(dev.calls, ["status"]);
}

#[test]
fn test_welcome_once_per_connection() {
    let (mut console, mut transport, mut dev) = setup();
    let mut welcomes = Vec::new();

    for (i, connected) in [false, true, true, false, true].into_iter().enumerate() {
        transport.set_connected(connected);
        let before = dev.calls.len();
        console.poll(&mut transport, &mut dev);
        if dev.calls.len() > before {
            welcomes.push(i + 1);
        }
    }
    assert_eq!(welcomes, [2, 5]);
}

#[test]
fn test_one_byte_per_poll() {
    let (mut console, mut transport, mut dev) = connected();
    transport.feed(b"cat 4\r");

    for i in 0..5 {
        assert!(console.poll(&mut transport, &mut dev).is_none(), "byte {}", i);
    }
    assert_eq!(transport.pending(), 1);
    assert_eq!(console.poll(&mut transport, &mut dev), Some(Ok(())));
    assert_eq!(dev.calls, ["cat Some(4)"]);
}

#[test]
fn test_echo_precedes_command_output() {
    let (mut console, mut transport, mut dev) = connected();
    let results = type_line(&mut console, &mut transport, &mut dev, "cat a\r");

    assert_eq!(results, [Ok(())]);
    assert_eq!(transport.output_str(), "cat a\r\ncat Some(10)\r\nTULIP> ");
}

#[test]
fn test_crlf_submits_once() {
    let (mut console, mut transport, mut dev) = connected();
    let results = type_line(&mut console, &mut transport, &mut dev, "blink\r\n");

    assert_eq!(results.len(), 1);
    assert_eq!(dev.calls, ["blink 5"]);
    assert_eq!(transport.output_str().matches(PROMPT).count(), 1);
}

#[test]
fn test_lf_alone_submits() {
    let (mut console, mut transport, mut dev) = connected();
    type_line(&mut console, &mut transport, &mut dev, "blink 1\nblink 2\n");
    assert_eq!(dev.calls, ["blink 1", "blink 2"]);
}

#[test]
fn test_empty_line_prints_prompt() {
    let (mut console, mut transport, mut dev) = connected();
    let results = type_line(&mut console, &mut transport, &mut dev, "\r");

    assert!(results.is_empty());
    assert_eq!(transport.output_str(), "\r\nTULIP> ");
}

#[test]
fn test_error_reported_then_prompt() {
    let (mut console, mut transport, mut dev) = connected();
    let results = type_line(&mut console, &mut transport, &mut dev, "cat 3\r");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_ref().unwrap_err().kind(), ErrorKind::OutOfRange);
    assert!(transport.output_str().ends_with("E03: cat: invalid value `3`, expected 4..F (hex)\r\nTULIP> "));
    assert!(dev.calls.is_empty());
}

#[test]
fn test_backspace_edits_line() {
    let (mut console, mut transport, mut dev) = connected();
    type_line(&mut console, &mut transport, &mut dev, "blinx\x7fk 2\r");

    assert_eq!(dev.calls, ["blink 2"]);
    assert!(transport.output_str().starts_with("blinx\x08 \x08k 2"));
}

#[test]
fn test_insert_after_cursor_left() {
    let (mut console, mut transport, mut dev) = connected();
    type_line(&mut console, &mut transport, &mut dev, "ca 5\x1b[D\x1b[Dt\r");
    assert_eq!(dev.calls, ["cat Some(5)"]);
}

#[test]
fn test_home_end_and_delete() {
    let (mut console, mut transport, mut dev) = connected();
    // "xcat 55" -> home, delete 'x', end, backspace
    type_line(&mut console, &mut transport, &mut dev, "xcat 55\x1b[H\x1b[3~\x1b[F\x08\r");
    assert_eq!(dev.calls, ["cat Some(5)"]);

    type_line(&mut console, &mut transport, &mut dev, "cat 6\x1b[1~\x1b[3~c\x1b[4~\r");
    assert_eq!(dev.calls, ["cat Some(5)", "cat Some(6)"]);
}

#[test]
fn test_modified_keys_ignored() {
    let (mut console, mut transport, mut dev) = connected();
    // Ctrl+Right, F5, PgUp, F1
    type_line(&mut console, &mut transport, &mut dev, "cat\x1b[1;5C\x1b[15~\x1b[5~\x1bOP");
    assert_eq!(console.line(), "cat");

    type_line(&mut console, &mut transport, &mut dev, " 4\r");
    assert_eq!(dev.calls, ["cat Some(4)"]);
}

#[test]
fn test_ss3_arrow_keys() {
    let (mut console, mut transport, mut dev) = connected();
    type_line(&mut console, &mut transport, &mut dev, "ct 4\x1bOH\x1bOCa\x1bOF\r");
    assert_eq!(dev.calls, ["cat Some(4)"]);
}

#[test]
fn test_lone_escape_keeps_next_key() {
    let (mut console, mut transport, mut dev) = connected();
    type_line(&mut console, &mut transport, &mut dev, "ca\x1bt\x1b\x1b 4");
    assert_eq!(console.line(), "cat 4");

    type_line(&mut console, &mut transport, &mut dev, "\x1b\r");
    assert_eq!(dev.calls, ["cat Some(4)"]);
}

#[test]
fn test_history_recall() {
    let (mut console, mut transport, mut dev) = connected();
    type_line(&mut console, &mut transport, &mut dev, "blink 3\r");
    type_line(&mut console, &mut transport, &mut dev, "\x1b[A\r");

    assert_eq!(dev.calls, ["blink 3", "blink 3"]);
    assert_eq!(console.history().len(), 1);
}

#[test]
fn test_history_down_returns_to_empty_line() {
    let (mut console, mut transport, mut dev) = connected();
    type_line(&mut console, &mut transport, &mut dev, "blink 3\r");
    type_line(&mut console, &mut transport, &mut dev, "\x1b[A\x1b[B");
    assert_eq!(console.line(), "");
}

#[test]
fn test_ctrl_u_kills_line() {
    let (mut console, mut transport, mut dev) = connected();
    type_line(&mut console, &mut transport, &mut dev, "junk\x15blink 4\r");
    assert_eq!(dev.calls, ["blink 4"]);
}

#[test]
fn test_ctrl_c_abandons_line() {
    let (mut console, mut transport, mut dev) = connected();
    let results = type_line(&mut console, &mut transport, &mut dev, "blink 4\x03");

    assert!(results.is_empty());
    assert!(dev.calls.is_empty());
    assert_eq!(console.line(), "");
    assert!(transport.output_str().ends_with("^C\r\nTULIP> "));
}

#[test]
fn test_overflow_rings_bell() {
    let (mut console, mut transport, mut dev) = connected();
    console.log_mut().set_level(LogLevel::Warn);
    let input = "a".repeat(LINE_SIZE + 2);
    type_line(&mut console, &mut transport, &mut dev, &input);

    assert_eq!(console.line().len(), LINE_SIZE);
    assert_eq!(transport.output().iter().filter(|&&b| b == 0x07).count(), 2);

    let log = console.log_mut();
    let warning = std::iter::from_fn(|| log.drain()).find(|e| e.level == LogLevel::Warn).unwrap();
    assert!(warning.msg.contains("line full"));
}

#[test]
fn test_disconnect_discards_partial_line() {
    let (mut console, mut transport, mut dev) = connected();
    type_line(&mut console, &mut transport, &mut dev, "cat");
    assert_eq!(console.line(), "cat");

    transport.set_connected(false);
    console.poll(&mut transport, &mut dev);
    assert_eq!(console.line(), "");

    transport.set_connected(true);
    type_line(&mut console, &mut transport, &mut dev, "blink\r");
    assert_eq!(dev.calls, ["status", "blink 5"]);
}

#[test]
fn test_echo_disabled() {
    let mut registry: Registry<Recorder> = Registry::new();
    register_builtins(&mut registry).unwrap();
    let config = ConsoleConfig { echo: false, ..ConsoleConfig::DEFAULT };
    let mut console = Interpreter::new(registry, config);
    let mut transport = Transport::new();
    let mut dev = Recorder::default();
    transport.set_connected(true);
    console.poll(&mut transport, &mut dev);
    transport.clear_output();

    type_line(&mut console, &mut transport, &mut dev, "cat 4\r");
    assert_eq!(transport.output_str(), "cat Some(4)\r\nTULIP> ");
}

#[test]
fn test_events_logged() {
    let (mut console, mut transport, mut dev) = setup();
    console.log_mut().set_level(LogLevel::Debug);
    transport.set_connected(true);
    console.poll(&mut transport, &mut dev);
    type_line(&mut console, &mut transport, &mut dev, "nope\r");

    let log = console.log_mut();
    let connect = log.drain().unwrap();
    assert_eq!(connect.level, LogLevel::Info);
    assert_eq!(connect.tick, 1);
    assert_eq!(log.drain().unwrap().level, LogLevel::Debug);
    let error = log.drain().unwrap();
    assert_eq!(error.level, LogLevel::Warn);
    assert!(error.msg.starts_with("E01"));
    assert!(!log.has_entries());
}

#[test]
fn test_every_poll_services_transport() {
    let (mut console, mut transport, mut dev) = connected();
    let before = transport.services();
    for _ in 0..4 {
        console.poll(&mut transport, &mut dev);
    }
    assert!(transport.services() - before >= 4);
}

// --- Test fixtures ---

#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl Recorder {
    fn record(&mut self, out: &mut Output<'_>, call: String) -> Result<(), ConsoleError> {
        cli_println!(out, "{}", call)?;
        self.calls.push(call);
        Ok(())
    }
}

impl Device for Recorder {
    fn status(&mut self, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.calls.push("status".into());
        cli_println!(out, "STATUS OK")
    }

    fn system(&mut self, op: SystemOp, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("system {:?}", op))
    }

    fn sdcard(&mut self, op: SdCardOp, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("sdcard {:?}", op))
    }

    fn dir(&mut self, path: &str, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("dir {}", path))
    }

    fn import(&mut self, req: ImportRequest<'_>, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("import {:?}", req))
    }

    fn delete(&mut self, name: &str, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("delete {}", name))
    }

    fn plug(&mut self, req: PlugRequest<'_>, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("plug {:?}", req))
    }

    fn unplug(&mut self, page: u8, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("unplug {}", page))
    }

    fn cat(&mut self, page: Option<u8>, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("cat {:?}", page))
    }

    fn printer(&mut self, op: PrinterOp, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("printer {:?}", op))
    }

    fn xmem(&mut self, op: XmemOp, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("xmem {:?}", op))
    }

    fn tracer(&mut self, op: TracerOp, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("tracer {:?}", op))
    }

    fn flash(&mut self, op: StorageOp, addr: Option<u32>, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("flash {:?} {:?}", op, addr))
    }

    fn fram(&mut self, op: StorageOp, addr: Option<u32>, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("fram {:?} {:?}", op, addr))
    }

    fn list(&mut self, filter: Option<ListFilter>, name: Option<&str>, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("list {:?} {:?}", filter, name))
    }

    fn rtc(&mut self, op: RtcOp, value: Option<&str>, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("rtc {:?} {:?}", op, value))
    }

    fn emulate(&mut self, op: EmulateOp, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("emulate {:?}", op))
    }

    fn blink(&mut self, count: u8, out: &mut Output<'_>) -> Result<(), ConsoleError> {
        self.record(out, format!("blink {}", count))
    }
}

type Console = Interpreter<'static, Recorder>;

fn setup() -> (Console, Transport, Recorder) {
    let mut registry = Registry::new();
    register_builtins(&mut registry).unwrap();
    (
        Interpreter::new(registry, ConsoleConfig::DEFAULT),
        Transport::new(),
        Recorder::default(),
    )
}

/// Connected console past its welcome, with the call log and output cleared
fn connected() -> (Console, Transport, Recorder) {
    let (mut console, mut transport, mut dev) = setup();
    transport.set_connected(true);
    console.poll(&mut transport, &mut dev);
    transport.clear_output();
    dev.calls.clear();
    (console, transport, dev)
}

/// Feed input and poll until it is consumed, collecting dispatch results
fn type_line(
    console: &mut Console,
    transport: &mut Transport,
    dev: &mut Recorder,
    input: &str,
) -> Vec<Result<(), ConsoleError>> {
    transport.feed(input.as_bytes());
    let mut results = Vec::new();
    while transport.pending() > 0 {
        if let Some(result) = console.poll(transport, dev) {
            results.push(result);
        }
    }
    results
}
