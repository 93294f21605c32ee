//! Board constants and monitor configuration

use picomon_gpu::{
    BoundsCheck, Color, FramebufferConfig, GpuConfig, LCD_FB0, LCD_FB1, LCD_HEIGHT, LCD_WIDTH,
};

/// Version reported by `ver`
pub const VERSION: &str = "0.0.1";

/// Bold cyan prompt
pub const PROMPT: &str = "\x1b[1;36mpicomon> \x1b[0m";

/// UART data register; reads are negative while the receive FIFO is empty
pub const UART_BASE: u32 = 0x8300_0000;

/// Bytes shown per `md`/`hd` page, also the address alignment
pub const DUMP_BLOCK: u32 = 256;

/// Most bytes one `mw` may write
pub const WRITE_MAX: usize = 256;

pub const BANNER: &str = concat!(
    "  ____  _          ____         ____\n",
    " |  _ \\(_) ___ ___/ ___|  ___  / ___|\n",
    " | |_) | |/ __/ _ \\___ \\ / _ \\| |\n",
    " |  __/| | (_| (_) |__) | (_) | |___\n",
    " |_|   |_|\\___\\___/____/ \\___/ \\____|\n\n",
);

/// Static address map printed by `map`
pub const MEMORY_MAP: &str = concat!(
    "0x00000000 - 0x007FFFFF 8MiB SPI Flash XIP\n",
    "0x40000000 - 0x40001FFF 8KiB SRAM\n",
    "0x80000000 - 0x8FFFFFFF PicoPeripherals\n",
    "    0x80000000 - 0x80001FFF 8KiB BROM\n",
    "    0x81000000 - 0x8100000F SPI Flash Config / Bitbang IO\n",
    "    0x82000000 - 0x8200000F GPIO\n",
    "    0x83000000 - 0x8300000F UART\n",
    "0xC0000000 - 0xFFFFFFFF Expansion region\n",
    "    0xC0000000 - 0xC07FFFFF PSRAM/LCD-FB\n",
    "    0xC1000000 - 0xC100001B LCD-FB registers\n",
);

/// Runtime view of the board layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub prompt: &'static str,
    /// Framebuffer 0, the one the software rasterizer draws into
    pub fb0: u32,
    pub fb1: u32,
    pub width: u32,
    pub height: u32,
    pub bounds: BoundsCheck,
    pub gpu: GpuConfig,
    /// Drawing color at startup
    pub color: Color,
}

impl MonitorConfig {
    /// Geometry of the framebuffer at `base`
    pub fn framebuffer(&self, base: u32) -> FramebufferConfig {
        FramebufferConfig {
            base,
            width: self.width,
            height: self.height,
            bounds: self.bounds,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            prompt: PROMPT,
            fb0: LCD_FB0,
            fb1: LCD_FB1,
            width: LCD_WIDTH,
            height: LCD_HEIGHT,
            bounds: BoundsCheck::default(),
            gpu: GpuConfig::default(),
            color: Color::WHITE,
        }
    }
}
