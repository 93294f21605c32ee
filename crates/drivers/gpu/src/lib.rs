//! picomon LCD Graphics
//!
//! Two ways onto the 1024x600 RGB565 panel:
//! - [`Rasterizer`]: software plotting straight into framebuffer memory
//! - [`Gpu`]: the memory-mapped drawing engine (clear, point, filled rect)
//!
//! Both reach hardware only through
//! [`PhysMemory`](picomon_driver_traits::PhysMemory), so they run unchanged
//! against [`Mmio`](picomon_driver_traits::Mmio) on the board and against a
//! simulated bus on the host.

#![cfg_attr(not(test), no_std)]

pub mod color;
pub mod font;
mod glyphs;
pub mod gpu;
pub mod raster;

pub use color::{Color, NAMED_COLORS};
pub use font::Font;
pub use gpu::{pack_point, unpack_point, CtrlStat, Gpu, GpuConfig, GpuOp, GpuOutcome, GpuReg};
pub use raster::{BoundsCheck, FramebufferConfig, Rasterizer};

/// Panel width in pixels
pub const LCD_WIDTH: u32 = 1024;
/// Panel height in pixels
pub const LCD_HEIGHT: u32 = 600;
/// Bytes per RGB565 pixel
pub const LCD_PIXEL_BYTES: u32 = 2;
/// Size of one full framebuffer
pub const LCD_FB_SIZE: u32 = LCD_WIDTH * LCD_HEIGHT * LCD_PIXEL_BYTES;

/// Framebuffer 0, start of PSRAM
pub const LCD_FB0: u32 = 0xC000_0000;
/// Framebuffer 1, directly after framebuffer 0
pub const LCD_FB1: u32 = LCD_FB0 + LCD_FB_SIZE;
/// GPU register block
pub const LCD_REG_BASE: u32 = 0xC100_0000;
