//! Firmware operations the console delegates to.
//!
//! Everything behind [`Device`] lives outside the console: SD card and
//! file system, FLASH/FRAM storage, ROM paging, printer, tracer, RTC. The
//! console validates arguments and hands over typed requests; the device
//! prints its own reports through the [`Output`] it is given and must call
//! [`Output::service`] during long operations.
//!
//! Sub-operation enums carry their opcode as discriminant: the 1-based
//! position of the keyword in the command's table.

use crate::console::{ConsoleError, Output};

/// `system` sub-operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemOp {
    Status = 1,
    Pio = 2,
    Cdc = 3,
    CdcIdent = 4,
    Reboot = 5,
    Bootsel = 6,
    PowerOn = 7,
    CalcReset = 8,
    ConfigInit = 9,
    ConfigList = 10,
}

/// `sdcard` sub-operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SdCardOp {
    Status = 1,
    Mount = 2,
    Unmount = 3,
    Mounted = 4,
    Connect = 5,
    Eject = 6,
}

/// `import` modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ImportFlag {
    /// Import every file in the named directory
    All = 1,
}

/// Validated `import` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportRequest<'a> {
    pub name: &'a str,
    pub modifiers: [Option<ImportFlag>; 2],
}

impl ImportRequest<'_> {
    /// Plain single-file import
    pub fn is_single_file(&self) -> bool {
        self.modifiers.iter().all(Option::is_none)
    }
}

/// ROM images built into the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BuiltinRom {
    /// HP-IL module, enables HP-IL emulation
    Hpil = 1,
    /// HP-IL printer ROM
    IlPrinter = 2,
    /// HP82143A printer ROM, enables printer emulation
    Printer = 3,
}

impl BuiltinRom {
    /// Page the ROM is always plugged into
    pub fn page(self) -> u8 {
        match self {
            BuiltinRom::Hpil => 7,
            BuiltinRom::IlPrinter | BuiltinRom::Printer => 6,
        }
    }
}

/// Validated `plug` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlugRequest<'a> {
    Builtin { rom: BuiltinRom, page: u8 },
    File { name: &'a str, page: u8 },
}

/// `printer` sub-operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrinterOp {
    Status = 1,
    Power = 2,
    Trace = 3,
    Norm = 4,
    Man = 5,
    Paper = 6,
    Print = 7,
    Adv = 8,
    IrTest = 9,
}

/// `xmem` sub-operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmemOp {
    Status,
    Dump,
    Pattern,
    Erase,
    /// Number of Extended Memory modules to emulate (0..=2)
    Modules(u8),
}

impl XmemOp {
    /// Offset separating numeric opcodes from keyword opcodes
    pub const NUMERIC_OFFSET: u8 = 10;

    pub fn opcode(self) -> u8 {
        match self {
            XmemOp::Status => 1,
            XmemOp::Dump => 2,
            XmemOp::Pattern => 3,
            XmemOp::Erase => 4,
            XmemOp::Modules(n) => n + Self::NUMERIC_OFFSET,
        }
    }
}

/// `tracer` sub-operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TracerOp {
    Status = 1,
    Trace = 2,
    SysLoop = 3,
    SysRom = 4,
    IlRom = 5,
    Hpil = 6,
    PilBox = 7,
    IlRegs = 8,
    Save = 9,
}

/// `flash` and `fram` sub-operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StorageOp {
    Status = 1,
    Dump = 2,
    Init = 3,
    NukeAll = 4,
}

/// `list` filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ListFilter {
    /// Include erased and dummy files
    All = 1,
    /// Extended details per file
    Ext = 2,
    Flash = 3,
    Fram = 4,
}

/// `rtc` sub-operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RtcOp {
    Status = 1,
    Set = 2,
    Get = 3,
    Reset = 4,
    Dump = 5,
    Display = 6,
}

/// `emulate` targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EmulateOp {
    Status = 1,
    Hpil = 2,
    Printer = 3,
}

/// Firmware operations reachable from the console
pub trait Device {
    /// Overall status report, also shown as the welcome on connect
    fn status(&mut self, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn system(&mut self, op: SystemOp, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn sdcard(&mut self, op: SdCardOp, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    /// Directory listing of the SD card
    fn dir(&mut self, path: &str, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn import(&mut self, req: ImportRequest<'_>, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn delete(&mut self, name: &str, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn plug(&mut self, req: PlugRequest<'_>, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn unplug(&mut self, page: u8, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    /// Catalog of one page, or a summary of all plugged ROMs
    fn cat(&mut self, page: Option<u8>, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn printer(&mut self, op: PrinterOp, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn xmem(&mut self, op: XmemOp, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn tracer(&mut self, op: TracerOp, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn flash(&mut self, op: StorageOp, addr: Option<u32>, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn fram(&mut self, op: StorageOp, addr: Option<u32>, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn list(&mut self, filter: Option<ListFilter>, name: Option<&str>, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn rtc(&mut self, op: RtcOp, value: Option<&str>, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    fn emulate(&mut self, op: EmulateOp, out: &mut Output<'_>) -> Result<(), ConsoleError>;

    /// Blink the status LED `count` times, 0 toggles it
    fn blink(&mut self, count: u8, out: &mut Output<'_>) -> Result<(), ConsoleError>;
}
