//! help, cls, ver

use picomon_driver_traits::{PhysMemory, SerialPort};

use super::COMMANDS;
use crate::config::VERSION;
use crate::error::CmdResult;
use crate::session::Session;
use crate::{console_print, console_println};

pub(super) fn help<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>) -> CmdResult {
    console_println!(s.con, "Commands available:");
    for (i, e) in COMMANDS.iter().enumerate() {
        if i > 0 {
            console_print!(s.con, ", ");
        }
        console_print!(s.con, "{}", e.name);
    }
    console_println!(s.con, ".");
    Ok(())
}

pub(super) fn clear_screen<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>) -> CmdResult {
    s.con.write_bytes(b"\x1b[H\x1b[J");
    Ok(())
}

pub(super) fn version<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>) -> CmdResult {
    console_println!(s.con, "PicoSoc mon ver={}", VERSION);
    Ok(())
}
