//! Per-monitor state
//!
//! Everything a command may touch lives here and is handed to handlers
//! explicitly: the memory capability, the console and the current drawing
//! color.

use picomon_driver_traits::{PhysMemory, SerialPort};
use picomon_gpu::{Color, Gpu, Rasterizer};

use crate::config::MonitorConfig;
use crate::console::Console;

pub struct Session<M: PhysMemory, S: SerialPort> {
    pub mem: M,
    pub con: Console<S>,
    /// Color used by drawing commands without an explicit color
    pub color: Color,
    pub config: MonitorConfig,
}

impl<M: PhysMemory, S: SerialPort> Session<M, S> {
    pub fn new(mem: M, port: S, config: MonitorConfig) -> Self {
        Session {
            mem,
            con: Console::new(port),
            color: config.color,
            config,
        }
    }

    /// GPU channel borrowing this session's memory
    pub fn gpu(&mut self) -> Gpu<&mut M> {
        Gpu::new(&mut self.mem, self.config.gpu)
    }

    /// Software rasterizer over framebuffer 0
    pub fn raster(&mut self) -> Rasterizer<&mut M> {
        let fb = self.config.framebuffer(self.config.fb0);
        Rasterizer::new(&mut self.mem, fb)
    }

    /// Rasterizer over the framebuffer at `base`
    pub fn raster_at(&mut self, base: u32) -> Rasterizer<&mut M> {
        let fb = self.config.framebuffer(base);
        Rasterizer::new(&mut self.mem, fb)
    }
}
