//! Bitmap fonts
//!
//! Glyphs are stored column-major: one byte per column, bit 0 is the top
//! row. Both fonts cover printable ASCII; other characters render as `?`.

use crate::glyphs::{FIXED_5X7, PROP_DATA, PROP_OFFSETS, PROP_WIDTHS};

const FIRST: u8 = 0x20;
const LAST: u8 = 0x7E;
const FIXED_WIDTH: usize = 5;

/// Rows per glyph column
pub const GLYPH_ROWS: u32 = 8;

/// Blank columns between adjacent glyphs
pub const SPACING: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Every glyph five columns wide
    Fixed5x7,
    /// Glyphs trimmed to their inked columns
    Proportional,
}

impl Font {
    /// Column bytes for `c`
    pub fn glyph(self, c: char) -> &'static [u8] {
        let code = match u8::try_from(c) {
            Ok(b) if (FIRST..=LAST).contains(&b) => b,
            _ => b'?',
        };
        let index = (code - FIRST) as usize;
        match self {
            Font::Fixed5x7 => {
                let start = index * FIXED_WIDTH;
                &FIXED_5X7[start..start + FIXED_WIDTH]
            }
            Font::Proportional => {
                let start = PROP_OFFSETS[index] as usize;
                &PROP_DATA[start..start + PROP_WIDTHS[index] as usize]
            }
        }
    }

    /// Horizontal distance from this glyph's origin to the next one
    pub fn advance(self, c: char) -> i32 {
        self.glyph(c).len() as i32 + SPACING
    }
}
