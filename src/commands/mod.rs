//! Command table and dispatcher
//!
//! Commands form a closed set: [`Command`] names every handler and
//! [`COMMANDS`] maps command-line names onto it. Lookup is exact and
//! case-sensitive, first match wins.

mod graphics;
mod info;
mod memory;

use log::debug;
use picomon_driver_traits::{PhysMemory, SerialPort};

use crate::error::{CmdError, CmdResult};
use crate::session::Session;
use crate::console_println;

pub use memory::{pager_step, PagerStep};

/// Every command the monitor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    ClearScreen,
    Version,
    /// One 256-byte block
    HexDump,
    /// Paged interactive dump
    MemDump,
    MemWrite,
    MemRead,
    ShowMap,
    GpuReg,
    ClearGraphics,
    DrawPoint,
    DrawLine,
    DrawRect,
    DrawCircle,
    SetColor,
    DrawText,
}

pub struct CommandEntry {
    pub name: &'static str,
    pub command: Command,
}

const fn entry(name: &'static str, command: Command) -> CommandEntry {
    CommandEntry { name, command }
}

/// Command names in lookup and `help` order
pub static COMMANDS: &[CommandEntry] = &[
    entry("?", Command::Help),
    entry("help", Command::Help),
    entry("cls", Command::ClearScreen),
    entry("ver", Command::Version),
    entry("hd", Command::HexDump),
    entry("md", Command::MemDump),
    entry("mw", Command::MemWrite),
    entry("mr", Command::MemRead),
    entry("map", Command::ShowMap),
    entry("greg", Command::GpuReg),
    entry("clg", Command::ClearGraphics),
    entry("pt", Command::DrawPoint),
    entry("line", Command::DrawLine),
    entry("rect", Command::DrawRect),
    entry("circle", Command::DrawCircle),
    entry("color", Command::SetColor),
    entry("tt", Command::DrawText),
];

/// Command registered under `name`
pub fn lookup(name: &str) -> Option<Command> {
    COMMANDS
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.command)
}

impl Command {
    /// Run with the full argument list, `args[0]` being the command name.
    pub fn run<M: PhysMemory, S: SerialPort>(self, s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
        match self {
            Command::Help => info::help(s),
            Command::ClearScreen => info::clear_screen(s),
            Command::Version => info::version(s),
            Command::HexDump => memory::dump(s, args, false),
            Command::MemDump => memory::dump(s, args, true),
            Command::MemWrite => memory::write(s, args),
            Command::MemRead => memory::read(s, args),
            Command::ShowMap => memory::show_map(s),
            Command::GpuReg => graphics::gpu_reg(s, args),
            Command::ClearGraphics => graphics::clear(s, args),
            Command::DrawPoint => graphics::point(s, args),
            Command::DrawLine => graphics::line(s, args),
            Command::DrawRect => graphics::rect(s, args),
            Command::DrawCircle => graphics::circle(s, args),
            Command::SetColor => graphics::set_color(s, args),
            Command::DrawText => graphics::text(s, args),
        }
    }
}

/// Look up `args[0]` and run it.
///
/// Returns 0 for an empty line or a successful command and -1 for an
/// unknown name or a failed command. Failures are reported on the console.
pub fn dispatch<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> i32 {
    let Some(&name) = args.first() else {
        return 0;
    };

    let Some(command) = lookup(name) else {
        console_println!(s.con, "Command <{}> not found.", name);
        return -1;
    };

    debug!("dispatch {:?} with {} args", command, args.len() - 1);
    match command.run(s, args) {
        Ok(()) => 0,
        Err(err) => {
            debug!("{} failed: {}", name, err);
            report(s, args, err);
            err.status()
        }
    }
}

fn report<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str], err: CmdError) {
    let name = args[0];
    match err {
        CmdError::Usage(text) => console_println!(s.con, "Usage: {} {}", name, text),
        CmdError::Lookup { what, position } => {
            let token = args.get(position).copied().unwrap_or("");
            console_println!(s.con, "{}: {} {} not found", name, what, token);
        }
        CmdError::Range(what) => console_println!(s.con, "{}: {} out of range", name, what),
        CmdError::BadArgument { position } => {
            console_println!(s.con, "{}: error: data parameter {}", name, position)
        }
        CmdError::Overflow => console_println!(
            s.con,
            "{}: error: more than {} bytes",
            name,
            crate::config::WRITE_MAX
        ),
    }
}
