//! Hex-plus-ASCII memory dump
//!
//! ```text
//! 40000000  48 65 6c 6c 6f 00 00 00  00 00 00 00 00 00 00 00  Hello...........
//! ```

use core::fmt::{self, Write};

const ROW: usize = 16;
const GROUP: usize = 8;

fn printable(b: u8) -> char {
    if (0x20..=0x7E).contains(&b) {
        b as char
    } else {
        '.'
    }
}

/// Rows of 16 bytes labelled from an address; see [`hex_dump`].
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a> {
    addr: u32,
    data: &'a [u8],
}

/// Render `data` as rows of 16 bytes labelled from `addr`.
///
/// A short final row is padded so its ASCII column lines up, and shows
/// only the bytes present.
pub fn hex_dump(addr: u32, data: &[u8]) -> HexDump<'_> {
    HexDump { addr, data }
}

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.data.chunks(ROW).enumerate() {
            write!(f, "{:08x} ", self.addr.wrapping_add((row * ROW) as u32))?;
            for i in 0..ROW {
                if i % GROUP == 0 {
                    f.write_str(" ")?;
                }
                match chunk.get(i) {
                    Some(b) => write!(f, "{:02x} ", b)?,
                    None => f.write_str("   ")?,
                }
            }
            f.write_str(" ")?;
            for &b in chunk {
                f.write_char(printable(b))?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
