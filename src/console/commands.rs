//! Command handlers
//!
//! One unit struct per console command. Handlers only validate and
//! translate arguments; the work itself is done by the [`Device`].

use crate::cli_println;
use crate::device::{
    BuiltinRom, Device, EmulateOp, ImportFlag, ImportRequest, ListFilter, PlugRequest, PrinterOp,
    SdCardOp, StorageOp, SystemOp, TracerOp, XmemOp,
};

use super::error::{ConsoleError, Range, RegistryError};
use super::output::{Output, CLEAR_SCREEN};
use super::parser::Args;
use super::registry::{Command, Registry};
use super::validate::{self, Choice, Disallow, Keywords, Subject};

/// ROM pages that can hold user ROMs
pub const PAGE_RANGE: Range = Range::hex(4, 15);

/// Blink count used when none is given
pub const DEFAULT_BLINKS: u8 = 5;

static SYSTEM_CMDS: Keywords<SystemOp> = Keywords::new(&[
    ("status", SystemOp::Status),
    ("pio", SystemOp::Pio),
    ("cdc", SystemOp::Cdc),
    ("cdcident", SystemOp::CdcIdent),
    ("REBOOT", SystemOp::Reboot),
    ("BOOTSEL", SystemOp::Bootsel),
    ("poweron", SystemOp::PowerOn),
    ("calcreset", SystemOp::CalcReset),
    ("configinit", SystemOp::ConfigInit),
    ("configlist", SystemOp::ConfigList),
]);

static SDCARD_CMDS: Keywords<SdCardOp> = Keywords::new(&[
    ("status", SdCardOp::Status),
    ("mount", SdCardOp::Mount),
    ("unmount", SdCardOp::Unmount),
    ("mounted", SdCardOp::Mounted),
    ("connect", SdCardOp::Connect),
    ("eject", SdCardOp::Eject),
]);

static IMPORT_CMDS: Keywords<ImportFlag> = Keywords::new(&[("ALL", ImportFlag::All)]);

static IMPORT_RULES: &[Disallow] = &[Disallow::SameOpcode];

static PLUG_CMDS: Keywords<BuiltinRom> = Keywords::new(&[
    ("hpil", BuiltinRom::Hpil),
    ("ilprinter", BuiltinRom::IlPrinter),
    ("printer", BuiltinRom::Printer),
]);

static PRINTER_CMDS: Keywords<PrinterOp> = Keywords::new(&[
    ("status", PrinterOp::Status),
    ("power", PrinterOp::Power),
    ("trace", PrinterOp::Trace),
    ("norm", PrinterOp::Norm),
    ("man", PrinterOp::Man),
    ("paper", PrinterOp::Paper),
    ("print", PrinterOp::Print),
    ("adv", PrinterOp::Adv),
    ("irtest", PrinterOp::IrTest),
]);

static XMEM_CMDS: Keywords<XmemOp> = Keywords::new(&[
    ("status", XmemOp::Status),
    ("dump", XmemOp::Dump),
    ("PATTERN", XmemOp::Pattern),
    ("ERASE", XmemOp::Erase),
]);

const XMEM_MODULES: Range = Range::decimal(0, 2);

static TRACER_CMDS: Keywords<TracerOp> = Keywords::new(&[
    ("status", TracerOp::Status),
    ("trace", TracerOp::Trace),
    ("sysloop", TracerOp::SysLoop),
    ("sysrom", TracerOp::SysRom),
    ("ilrom", TracerOp::IlRom),
    ("hpil", TracerOp::Hpil),
    ("pilbox", TracerOp::PilBox),
    ("ilregs", TracerOp::IlRegs),
    ("save", TracerOp::Save),
]);

static STORAGE_CMDS: Keywords<StorageOp> = Keywords::new(&[
    ("status", StorageOp::Status),
    ("dump", StorageOp::Dump),
    ("INIT", StorageOp::Init),
    ("NUKEALL", StorageOp::NukeAll),
]);

static LIST_CMDS: Keywords<ListFilter> = Keywords::new(&[
    ("all", ListFilter::All),
    ("ext", ListFilter::Ext),
    ("flash", ListFilter::Flash),
    ("fram", ListFilter::Fram),
]);

#[cfg(feature = "module")]
static RTC_CMDS: Keywords<crate::device::RtcOp> = {
    use crate::device::RtcOp;
    Keywords::new(&[
        ("status", RtcOp::Status),
        ("set", RtcOp::Set),
        ("get", RtcOp::Get),
        ("reset", RtcOp::Reset),
        ("dump", RtcOp::Dump),
        ("display", RtcOp::Display),
    ])
};

static EMULATE_CMDS: Keywords<EmulateOp> = Keywords::new(&[
    ("status", EmulateOp::Status),
    ("hpil", EmulateOp::Hpil),
    ("printer", EmulateOp::Printer),
]);

const BLINK_RANGE: Range = Range::decimal(0, 9);

const IMPORT_USAGE: &str = "import [filename] <ALL>";
const DELETE_USAGE: &str = "delete [filename]";
const PLUG_USAGE: &str = "plug [filename] [page in hex], or plug hpil/ilprinter/printer";
const UNPLUG_USAGE: &str = "unplug [page in hex]";

/// Register every built-in command, in the order `help` lists them
pub fn register_builtins<'r, D, const N: usize>(registry: &mut Registry<'r, D, N>) -> Result<(), RegistryError>
where
    D: Device + ?Sized + 'r,
{
    registry.register(&SystemCmd)?;
    registry.register(&SdCardCmd)?;
    #[cfg(feature = "module")]
    registry.register(&RtcCmd)?;
    registry.register(&ClearCmd)?;
    registry.register(&BlinkCmd)?;
    registry.register(&PrinterCmd)?;
    registry.register(&TracerCmd)?;
    registry.register(&XmemCmd)?;
    registry.register(&FlashCmd)?;
    registry.register(&FramCmd)?;
    registry.register(&DirCmd)?;
    registry.register(&ListCmd)?;
    registry.register(&DeleteCmd)?;
    registry.register(&ImportCmd)?;
    registry.register(&PlugCmd)?;
    registry.register(&UnplugCmd)?;
    registry.register(&CatCmd)?;
    registry.register(&EmulateCmd)?;
    Ok(())
}

fn no_args_hint(out: &mut Output<'_>, command: &str) -> Result<(), ConsoleError> {
    cli_println!(out, "no arguments given, use: {} [command], see help {}", command, command)
}

// --- Command Implementations ---

pub struct SystemCmd;

impl<D: Device + ?Sized> Command<D> for SystemCmd {
    fn name(&self) -> &'static str {
        "system"
    }

    fn help(&self) -> &'static str {
        "system status and control\n\
         [no argument] show the system status\n\
         status      show the system status\n\
         pio         show PIO status\n\
         cdc         show status of the CDC (serial) ports\n\
         cdcident    identify the CDC ports\n\
         REBOOT      reboot the TULIP\n\
         BOOTSEL     reboot into BOOTSEL mode for a firmware update\n\
         poweron     send a power on to the calculator\n\
         calcreset   reset the calculator\n\
         configinit  re-initialize the persistent settings\n\
         configlist  list the persistent settings"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let Some(arg) = args.token(1) else {
            cli_println!(out, "type help for more info")?;
            return dev.status(out);
        };
        match validate::keyword("system", &SYSTEM_CMDS, arg)? {
            SystemOp::Status => dev.status(out),
            op => dev.system(op, out),
        }
    }
}

pub struct SdCardCmd;

impl<D: Device + ?Sized> Command<D> for SdCardCmd {
    fn name(&self) -> &'static str {
        "sdcard"
    }

    fn help(&self) -> &'static str {
        "uSD card functions\n\
         [no argument] show the uSD card status\n\
         status      show the uSD card status\n\
         mount       mount the uSD card\n\
         unmount     unmount the uSD card\n\
         mounted     check if the uSD card is mounted\n\
         connect     connect the uSD card as USB mass storage\n\
         eject       eject the uSD card from the USB host"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let Some(arg) = args.token(1) else {
            cli_println!(out, "type help for more info")?;
            return dev.sdcard(SdCardOp::Status, out);
        };
        let op = validate::keyword("sdcard", &SDCARD_CMDS, arg)?;
        dev.sdcard(op, out)
    }
}

pub struct DirCmd;

impl<D: Device + ?Sized> Command<D> for DirCmd {
    fn name(&self) -> &'static str {
        "dir"
    }

    fn help(&self) -> &'static str {
        "dir [subdir], show the uSD card directory"
    }

    // paths may contain spaces
    fn tokenize(&self) -> bool {
        false
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let path = if args.is_empty() { "." } else { args.raw() };
        dev.dir(path, out)
    }
}

pub struct ImportCmd;

impl<D: Device + ?Sized> Command<D> for ImportCmd {
    fn name(&self) -> &'static str {
        "import"
    }

    fn help(&self) -> &'static str {
        "import files from the uSD card into FLASH\n\
         import [filename]      import a single file\n\
         import [directory] ALL import all files in the directory"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let name = args.token(1).ok_or(ConsoleError::MissingArg {
            command: "import",
            usage: IMPORT_USAGE,
        })?;
        let modifiers = validate::combination(
            "import",
            &IMPORT_CMDS,
            [args.token(2), args.token(3)],
            IMPORT_RULES,
            IMPORT_USAGE,
        )?;
        dev.import(ImportRequest { name, modifiers }, out)
    }
}

pub struct DeleteCmd;

impl<D: Device + ?Sized> Command<D> for DeleteCmd {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn help(&self) -> &'static str {
        "delete [filename], delete a file from the FLASH file system"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let name = args.token(1).ok_or(ConsoleError::MissingArg {
            command: "delete",
            usage: DELETE_USAGE,
        })?;
        dev.delete(name, out)
    }
}

pub struct PlugCmd;

impl<D: Device + ?Sized> Command<D> for PlugCmd {
    fn name(&self) -> &'static str {
        "plug"
    }

    fn help(&self) -> &'static str {
        "plug a ROM in a Page\n\
         hpil          plug the embedded HP-IL ROM in Page 7 and enable emulation\n\
         ilprinter     plug the embedded HP-IL printer ROM in Page 6\n\
         printer       plug the embedded HP82143A printer ROM in Page 6\n\
         [filename] P  plug the ROM file in Page P (hex, 4..F)\n\
         use the cat command to show the plugged ROMs"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let missing = ConsoleError::MissingArg { command: "plug", usage: PLUG_USAGE };
        match validate::subject(&PLUG_CMDS, args.token(1)) {
            Subject::Absent => Err(missing),
            Subject::Keyword(rom) => dev.plug(PlugRequest::Builtin { rom, page: rom.page() }, out),
            Subject::Name(name) => {
                let page = args.token(2).ok_or(missing)?;
                let page = validate::hex_in_range("plug", page, PAGE_RANGE)? as u8;
                dev.plug(PlugRequest::File { name, page }, out)
            }
        }
    }
}

pub struct UnplugCmd;

impl<D: Device + ?Sized> Command<D> for UnplugCmd {
    fn name(&self) -> &'static str {
        "unplug"
    }

    fn help(&self) -> &'static str {
        "unplug [page], remove the ROM from Page (hex, 4..F)"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let page = args.token(1).ok_or(ConsoleError::MissingArg {
            command: "unplug",
            usage: UNPLUG_USAGE,
        })?;
        let page = validate::hex_in_range("unplug", page, PAGE_RANGE)? as u8;
        dev.unplug(page, out)
    }
}

pub struct CatCmd;

impl<D: Device + ?Sized> Command<D> for CatCmd {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn help(&self) -> &'static str {
        "cat [page], catalog of the ROM in Page (hex, 4..F)\n\
         [no argument] summary of all plugged ROMs"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let Some(arg) = args.token(1) else {
            no_args_hint(out, "cat")?;
            return dev.cat(None, out);
        };
        let page = validate::hex_in_range("cat", arg, PAGE_RANGE)? as u8;
        dev.cat(Some(page), out)
    }
}

pub struct PrinterCmd;

impl<D: Device + ?Sized> Command<D> for PrinterCmd {
    fn name(&self) -> &'static str {
        "printer"
    }

    fn help(&self) -> &'static str {
        "HP82143A printer functions\n\
         [no argument] show the printer status\n\
         status   show the printer status\n\
         power    toggle printer power\n\
         trace    printer mode TRACE\n\
         norm     printer mode NORM\n\
         man      printer mode MAN\n\
         paper    toggle the out of paper status\n\
         print    push the PRINT button\n\
         adv      push the ADV button\n\
         irtest   test the infrared LED"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let Some(arg) = args.token(1) else {
            no_args_hint(out, "printer")?;
            return dev.printer(PrinterOp::Status, out);
        };
        let op = validate::keyword("printer", &PRINTER_CMDS, arg)?;
        dev.printer(op, out)
    }
}

pub struct XmemCmd;

impl<D: Device + ?Sized> Command<D> for XmemCmd {
    fn name(&self) -> &'static str {
        "xmem"
    }

    fn help(&self) -> &'static str {
        "Extended Memory functions\n\
         [no argument] show the Extended Memory status\n\
         status   show the Extended Memory status\n\
         dump     dump the Extended Memory contents\n\
         PATTERN  program a test pattern\n\
         ERASE    erase all Extended Memory\n\
         0..2     number of Extended Memory modules"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let Some(arg) = args.token(1) else {
            no_args_hint(out, "xmem")?;
            return dev.xmem(XmemOp::Status, out);
        };
        let (_, choice) =
            validate::keyword_or_decimal("xmem", &XMEM_CMDS, arg, XMEM_MODULES, XmemOp::NUMERIC_OFFSET)?;
        let op = match choice {
            Choice::Keyword(op) => op,
            Choice::Number(n) => XmemOp::Modules(n as u8),
        };
        dev.xmem(op, out)
    }
}

pub struct TracerCmd;

impl<D: Device + ?Sized> Command<D> for TracerCmd {
    fn name(&self) -> &'static str {
        "tracer"
    }

    fn help(&self) -> &'static str {
        "tracer functions\n\
         [no argument] show the tracer status\n\
         status   show the tracer status\n\
         trace    toggle tracer enable/disable\n\
         sysloop  toggle tracing of system loops\n\
         sysrom   toggle system ROM tracing (Page 0, 1, 2, 3, 5)\n\
         ilrom    toggle tracing of Page 6 + 7\n\
         hpil     toggle HP-IL tracing\n\
         pilbox   toggle PILBox serial tracing\n\
         ilregs   toggle tracing of the HP-IL registers\n\
         save     save the tracer settings"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let Some(arg) = args.token(1) else {
            no_args_hint(out, "tracer")?;
            return dev.tracer(TracerOp::Status, out);
        };
        let op = validate::keyword("tracer", &TRACER_CMDS, arg)?;
        dev.tracer(op, out)
    }
}

/// Shared argument handling of `flash` and `fram`
///
/// An omitted address is `None`; an unparsable one is reported and
/// becomes 0.
fn storage_args(
    command: &'static str,
    args: Args<'_>,
    out: &mut Output<'_>,
) -> Result<(StorageOp, Option<u32>), ConsoleError> {
    let Some(arg) = args.token(1) else {
        no_args_hint(out, command)?;
        return Ok((StorageOp::Status, None));
    };
    let op = validate::keyword(command, &STORAGE_CMDS, arg)?;
    let addr = match args.token(2) {
        None => None,
        Some(token) => match validate::parse_hex(token) {
            Some(addr) => Some(addr),
            None => {
                cli_println!(out, "invalid address {}: address defaults to 0", token)?;
                Some(0)
            }
        },
    };
    Ok((op, addr))
}

pub struct FlashCmd;

impl<D: Device + ?Sized> Command<D> for FlashCmd {
    fn name(&self) -> &'static str {
        "flash"
    }

    fn help(&self) -> &'static str {
        "FLASH file system functions\n\
         [no argument] show the FLASH status\n\
         status         show the FLASH status\n\
         dump [addr]    dump FLASH contents from hex address\n\
         INIT           initialize the FLASH file system\n\
         NUKEALL        erase all FLASH pages"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let (op, addr) = storage_args("flash", args, out)?;
        dev.flash(op, addr, out)
    }
}

pub struct FramCmd;

impl<D: Device + ?Sized> Command<D> for FramCmd {
    fn name(&self) -> &'static str {
        "fram"
    }

    fn help(&self) -> &'static str {
        "FRAM file system functions\n\
         [no argument] show the FRAM status\n\
         status         show the FRAM status\n\
         dump [addr]    dump FRAM contents from hex address\n\
         INIT           initialize the FRAM file system\n\
         NUKEALL        erase all of FRAM"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let (op, addr) = storage_args("fram", args, out)?;
        dev.fram(op, addr, out)
    }
}

pub struct ListCmd;

impl<D: Device + ?Sized> Command<D> for ListCmd {
    fn name(&self) -> &'static str {
        "list"
    }

    fn help(&self) -> &'static str {
        "list files in the FLASH/FRAM file system\n\
         [no argument]  list all files\n\
         [filename]     details of one file, or the first file starting with the name\n\
         all            include erased and dummy files\n\
         ext            extended listing with more details per file\n\
         flash / fram   list the files in FLASH or FRAM only"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        match validate::subject(&LIST_CMDS, args.token(1)) {
            Subject::Absent => dev.list(None, None, out),
            Subject::Keyword(filter) => dev.list(Some(filter), args.token(2), out),
            Subject::Name(name) if args.token(2).is_none() => dev.list(None, Some(name), out),
            Subject::Name(name) => Err(ConsoleError::unknown_sub("list", name)),
        }
    }
}

#[cfg(feature = "module")]
pub struct RtcCmd;

#[cfg(feature = "module")]
impl<D: Device + ?Sized> Command<D> for RtcCmd {
    fn name(&self) -> &'static str {
        "rtc"
    }

    fn help(&self) -> &'static str {
        "RTC functions\n\
         [no argument] show the RTC status\n\
         status         show the RTC status\n\
         set [value]    set the RTC date and time\n\
         get            get the current date and time\n\
         reset          reset the RTC\n\
         dump           dump the RTC registers\n\
         display        test the display"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        use crate::device::RtcOp;

        let Some(arg) = args.token(1) else {
            no_args_hint(out, "rtc")?;
            return dev.rtc(RtcOp::Status, None, out);
        };
        let op = validate::keyword("rtc", &RTC_CMDS, arg)?;
        dev.rtc(op, args.rest(2), out)
    }
}

pub struct EmulateCmd;

impl<D: Device + ?Sized> Command<D> for EmulateCmd {
    fn name(&self) -> &'static str {
        "emulate"
    }

    fn help(&self) -> &'static str {
        "peripheral emulation\n\
         [no argument] show the emulation status\n\
         status    show the emulation status\n\
         hpil      toggle HP-IL emulation\n\
         printer   toggle HP82143A printer emulation"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let Some(arg) = args.token(1) else {
            no_args_hint(out, "emulate")?;
            return dev.emulate(EmulateOp::Status, out);
        };
        let op = validate::keyword("emulate", &EMULATE_CMDS, arg)?;
        dev.emulate(op, out)
    }
}

pub struct BlinkCmd;

impl<D: Device + ?Sized> Command<D> for BlinkCmd {
    fn name(&self) -> &'static str {
        "blink"
    }

    fn help(&self) -> &'static str {
        "blink [b], blink the LED b times (0..9), 0 toggles the LED"
    }

    fn invoke(&self, out: &mut Output<'_>, args: Args<'_>, dev: &mut D) -> Result<(), ConsoleError> {
        let count = match args.token(1) {
            None => DEFAULT_BLINKS,
            Some(arg) => validate::decimal_in_range("blink", arg, BLINK_RANGE)? as u8,
        };
        dev.blink(count, out)
    }
}

pub struct ClearCmd;

impl<D: Device + ?Sized> Command<D> for ClearCmd {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn help(&self) -> &'static str {
        "clears the console"
    }

    fn invoke(&self, out: &mut Output<'_>, _args: Args<'_>, _dev: &mut D) -> Result<(), ConsoleError> {
        out.write_text(CLEAR_SCREEN);
        Ok(())
    }
}
