//! hd, md, mr, mw, map

use picomon_driver_traits::{PhysMemory, SerialPort};

use crate::args::{find_opt, parse_hex, parse_u32};
use crate::config::{DUMP_BLOCK, MEMORY_MAP, WRITE_MAX};
use crate::error::{CmdError, CmdResult};
use crate::hexdump::hex_dump;
use crate::session::Session;
use crate::{console_print, console_println};

const DUMP_USAGE: &str = "<address>";
const READ_USAGE: &str = "[-bsw] <addr>\n    -b ubyte, -s ushort -w uint32(default)";
const WRITE_USAGE: &str = "<addr> <\"string\"|byte> [\"strings\"|<bytes>...]";

/// Result of one key press in the dump pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerStep {
    /// Show the block at this address
    Goto(u32),
    Quit,
    /// Key has no binding; keep waiting
    Ignore,
}

/// Pager key bindings.
///
/// `p` jumps to 0, `1`/`2`/`3` move forward 4K/64K/1M and `!`/`@`/`#`
/// back by the same, space or `n` shows the next block, `b` the previous
/// one, `q` or Ctrl-C quits. Addresses wrap.
pub fn pager_step(addr: u32, key: u8) -> PagerStep {
    match key {
        b'p' => PagerStep::Goto(0),
        b'1' => PagerStep::Goto(addr.wrapping_add(0x1000)),
        b'2' => PagerStep::Goto(addr.wrapping_add(0x1_0000)),
        b'3' => PagerStep::Goto(addr.wrapping_add(0x10_0000)),
        b'!' => PagerStep::Goto(addr.wrapping_sub(0x1000)),
        b'@' => PagerStep::Goto(addr.wrapping_sub(0x1_0000)),
        b'#' => PagerStep::Goto(addr.wrapping_sub(0x10_0000)),
        b' ' | b'n' | b'N' => PagerStep::Goto(addr.wrapping_add(DUMP_BLOCK)),
        b'b' | b'B' => PagerStep::Goto(addr.wrapping_sub(DUMP_BLOCK)),
        b'q' | b'Q' | 0x03 => PagerStep::Quit,
        _ => PagerStep::Ignore,
    }
}

/// Dump the block holding the address; `paged` keeps paging on key
/// presses until quit and is the only command that waits for input.
pub(super) fn dump<M: PhysMemory, S: SerialPort>(
    s: &mut Session<M, S>,
    args: &[&str],
    paged: bool,
) -> CmdResult {
    let arg = args.get(1).ok_or(CmdError::Usage(DUMP_USAGE))?;
    let mut addr = parse_u32(arg).ok_or(CmdError::Usage(DUMP_USAGE))? & !(DUMP_BLOCK - 1);
    let mut block = [0u8; DUMP_BLOCK as usize];

    loop {
        s.mem.read_block(addr, &mut block);
        console_print!(s.con, "{}", hex_dump(addr, &block));
        if !paged {
            return Ok(());
        }

        console_print!(s.con, "...");
        let next = loop {
            match pager_step(addr, s.con.read_key()) {
                PagerStep::Ignore => continue,
                step => break step,
            }
        };
        console_println!(s.con);

        match next {
            PagerStep::Goto(a) => addr = a,
            _ => return Ok(()),
        }
    }
}

pub(super) fn read<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    if args.len() < 2 {
        return Err(CmdError::Usage(READ_USAGE));
    }
    let last = args[args.len() - 1];
    if !last.starts_with(|c: char| c.is_ascii_hexdigit()) {
        return Err(CmdError::Usage(READ_USAGE));
    }
    let addr = parse_u32(last).ok_or(CmdError::Usage(READ_USAGE))?;

    if find_opt(args, "-s").is_some() {
        console_println!(s.con, "0x{:04x}", s.mem.read_u16(addr & !0x1));
    } else if find_opt(args, "-b").is_some() {
        console_println!(s.con, "0x{:02x}", s.mem.read_u8(addr));
    } else {
        console_println!(s.con, "0x{:08x}", s.mem.read_u32(addr & !0x3));
    }
    Ok(())
}

/// Text if any character is outside hex digits and `x`, or longer than a
/// byte literal can be.
fn is_text(arg: &str) -> bool {
    arg.len() > 4 || arg.bytes().any(|b| !(b.is_ascii_hexdigit() || b == b'x' || b == b'X'))
}

/// Collects the bytes `mw` will write before anything is stored.
struct WriteBuffer {
    bytes: [u8; WRITE_MAX],
    len: usize,
}

impl WriteBuffer {
    fn new() -> Self {
        WriteBuffer {
            bytes: [0; WRITE_MAX],
            len: 0,
        }
    }

    fn extend(&mut self, data: &[u8]) -> CmdResult {
        let end = self.len + data.len();
        if end > WRITE_MAX {
            return Err(CmdError::Overflow);
        }
        self.bytes[self.len..end].copy_from_slice(data);
        self.len = end;
        Ok(())
    }

    fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

pub(super) fn write<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    if args.len() < 3 {
        return Err(CmdError::Usage(WRITE_USAGE));
    }
    let addr = parse_u32(args[1]).ok_or(CmdError::Usage(WRITE_USAGE))?;

    let mut buf = WriteBuffer::new();
    for (i, arg) in args[2..].iter().enumerate() {
        if is_text(arg) {
            buf.extend(arg.as_bytes())?;
        } else {
            let value = parse_hex(arg)
                .and_then(|v| u8::try_from(v).ok())
                .ok_or(CmdError::BadArgument { position: i + 1 })?;
            buf.extend(&[value])?;
        }
    }

    let data = buf.as_slice();
    console_println!(
        s.con,
        "{}: writing mem at addr 0x{:x} with {} bytes:",
        args[0],
        addr,
        data.len()
    );
    for b in data {
        console_print!(s.con, "0x{:02x} ", b);
    }
    console_println!(s.con);

    s.mem.write_block(addr, data);
    Ok(())
}

pub(super) fn show_map<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>) -> CmdResult {
    console_print!(s.con, "{}", MEMORY_MAP);
    Ok(())
}
