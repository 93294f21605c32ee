//! Color handling for the LCD framebuffer
//!
//! Colors travel as u32 ARGB and are packed to RGB565 only when a pixel is
//! written. No floating point.

/// ARGB color (0xAARRGGBB format)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

/// Red field of an RGB565 pixel
pub const RGB565_RED: u16 = 0xF800;
/// Green field of an RGB565 pixel
pub const RGB565_GREEN: u16 = 0x07E0;
/// Blue field of an RGB565 pixel
pub const RGB565_BLUE: u16 = 0x001F;

impl Color {
    pub const WHITE: Self = Self(0xFFFFFF);

    #[inline]
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Color without its alpha byte
    #[inline]
    pub const fn rgb(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Pack into the panel's 5-6-5 pixel format, dropping low bits
    #[inline]
    pub const fn to_rgb565(self) -> u16 {
        (((self.0 >> 8) as u16) & RGB565_RED)
            | (((self.0 >> 5) as u16) & RGB565_GREEN)
            | (((self.0 >> 3) as u16) & RGB565_BLUE)
    }

    /// Parse a hex literal or a color name.
    ///
    /// A token made only of hex digits is taken as ARGB hex, so `"ff0000"`
    /// is red with zero alpha. Anything else is looked up by name, ignoring
    /// case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        if s.len() <= 8 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return u32::from_str_radix(s, 16).ok().map(Self);
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, color)| color)
    }

    /// Name of this color in [`NAMED_COLORS`], ignoring alpha
    pub fn name(self) -> Option<&'static str> {
        NAMED_COLORS
            .iter()
            .find(|(_, color)| color.rgb() == self.rgb())
            .map(|&(name, _)| name)
    }
}

/// The sixteen HTML basic colors
pub const NAMED_COLORS: [(&str, Color); 16] = [
    ("black", Color(0x000000)),
    ("white", Color(0xFFFFFF)),
    ("red", Color(0xFF0000)),
    ("lime", Color(0x00FF00)),
    ("blue", Color(0x0000FF)),
    ("yellow", Color(0xFFFF00)),
    ("cyan", Color(0x00FFFF)),
    ("magenta", Color(0xFF00FF)),
    ("silver", Color(0xC0C0C0)),
    ("gray", Color(0x808080)),
    ("maroon", Color(0x800000)),
    ("olive", Color(0x808000)),
    ("green", Color(0x008000)),
    ("purple", Color(0x800080)),
    ("teal", Color(0x008080)),
    ("navy", Color(0x000080)),
];
