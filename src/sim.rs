//! Simulated board bus for the host binary
//!
//! Sparse RAM everywhere, both framebuffers as flat video memory, and a
//! drawing engine behind the register block that executes an operation
//! the moment it is triggered. `latency` makes the busy bit read as set
//! for that many status reads afterwards.

use std::cell::Cell;
use std::io::{self, Write};

use log::{debug, trace};
use picomon_driver_traits::{PhysMemory, SparseMemory};
use picomon_gpu::{
    pack_point, unpack_point, Color, CtrlStat, GpuOp, GpuReg, LCD_FB0, LCD_FB_SIZE, LCD_HEIGHT,
    LCD_PIXEL_BYTES, LCD_REG_BASE, LCD_WIDTH,
};

const VRAM_SIZE: u32 = 2 * LCD_FB_SIZE;
const REG_COUNT: u32 = GpuReg::ALL.len() as u32;

pub struct SimBus {
    ram: SparseMemory,
    vram: Vec<u8>,
    regs: [u32; GpuReg::ALL.len()],
    latency: u32,
    busy_left: Cell<u32>,
    executed: u32,
}

enum Region {
    Vram(usize),
    Reg(GpuReg, u32),
    Ram,
}

impl SimBus {
    pub fn new(latency: u32) -> Self {
        let mut regs = [0; GpuReg::ALL.len()];
        regs[GpuReg::DispAddr.index() as usize] = LCD_FB0;
        regs[GpuReg::WorkAddr.index() as usize] = LCD_FB0;
        regs[GpuReg::Size.index() as usize] = pack_point(LCD_WIDTH as i32, LCD_HEIGHT as i32);
        SimBus {
            ram: SparseMemory::new(),
            vram: vec![0; VRAM_SIZE as usize],
            regs,
            latency,
            busy_left: Cell::new(0),
            executed: 0,
        }
    }

    /// Operations the engine has run
    pub fn executed(&self) -> u32 {
        self.executed
    }

    /// RGB565 value of pixel (x, y) in the buffer at `base`
    pub fn pixel(&self, base: u32, x: u32, y: u32) -> u16 {
        self.read_u16(base + (y * LCD_WIDTH + x) * LCD_PIXEL_BYTES)
    }

    fn region(addr: u32) -> Region {
        if (LCD_FB0..LCD_FB0 + VRAM_SIZE).contains(&addr) {
            return Region::Vram((addr - LCD_FB0) as usize);
        }
        if (LCD_REG_BASE..LCD_REG_BASE + REG_COUNT * 4).contains(&addr) {
            let offset = addr - LCD_REG_BASE;
            if let Ok(reg) = GpuReg::from_index(offset / 4) {
                return Region::Reg(reg, (offset % 4) * 8);
            }
        }
        Region::Ram
    }

    fn reg(&self, reg: GpuReg) -> u32 {
        self.regs[reg.index() as usize]
    }

    fn load_reg(&self, reg: GpuReg) -> u32 {
        if reg != GpuReg::CtrlStat {
            return self.reg(reg);
        }
        let left = self.busy_left.get();
        if left > 0 {
            self.busy_left.set(left - 1);
            return CtrlStat::BUSY.bits();
        }
        // The engine drops the command once it finishes
        0
    }

    fn store_reg(&mut self, reg: GpuReg, value: u32) {
        self.regs[reg.index() as usize] = value;
        if reg != GpuReg::CtrlStat {
            return;
        }
        match GpuOp::decode(value) {
            Some(op) => {
                self.execute(op);
                self.busy_left.set(self.latency);
            }
            None if value & CtrlStat::TRIGGER.bits() != 0 => {
                debug!("sim: ignoring unknown command {:#x}", value);
            }
            None => {}
        }
    }

    fn put_pixel(&mut self, base: u32, x: u32, y: u32, pixel: u16) {
        if x >= LCD_WIDTH || y >= LCD_HEIGHT {
            return;
        }
        let addr = base.wrapping_add((y * LCD_WIDTH + x) * LCD_PIXEL_BYTES);
        if let Region::Vram(i) = Self::region(addr) {
            if i + 1 < self.vram.len() {
                self.vram[i..i + 2].copy_from_slice(&pixel.to_le_bytes());
            }
        }
    }

    fn execute(&mut self, op: GpuOp) {
        let work = self.reg(GpuReg::WorkAddr);
        let pixel = Color(self.reg(GpuReg::Color)).to_rgb565();
        let (x0, y0) = unpack_point(self.reg(GpuReg::X0Y0));
        let (x1, y1) = unpack_point(self.reg(GpuReg::X1Y1));
        trace!("sim: {:?} into {:#010x}", op, work);

        let (xs, ys) = match op {
            GpuOp::SetBackground => (0..=LCD_WIDTH - 1, 0..=LCD_HEIGHT - 1),
            GpuOp::SetPoint => (x0 as u32..=x0 as u32, y0 as u32..=y0 as u32),
            GpuOp::FillRect => (
                x0.min(x1) as u32..=(x0.max(x1) as u32).min(LCD_WIDTH - 1),
                y0.min(y1) as u32..=(y0.max(y1) as u32).min(LCD_HEIGHT - 1),
            ),
        };
        for y in ys {
            for x in xs.clone() {
                self.put_pixel(work, x, y, pixel);
            }
        }
        self.executed += 1;
    }

    /// Write the displayed buffer as a binary PPM image.
    pub fn screenshot<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let base = self.reg(GpuReg::DispAddr);
        write!(out, "P6\n{} {}\n255\n", LCD_WIDTH, LCD_HEIGHT)?;
        let mut row = Vec::with_capacity(LCD_WIDTH as usize * 3);
        for y in 0..LCD_HEIGHT {
            row.clear();
            for x in 0..LCD_WIDTH {
                let p = self.pixel(base, x, y);
                let r = ((p >> 11) & 0x1F) as u8;
                let g = ((p >> 5) & 0x3F) as u8;
                let b = (p & 0x1F) as u8;
                row.extend_from_slice(&[r << 3 | r >> 2, g << 2 | g >> 4, b << 3 | b >> 2]);
            }
            out.write_all(&row)?;
        }
        Ok(())
    }
}

impl PhysMemory for SimBus {
    fn read_u8(&self, addr: u32) -> u8 {
        match Self::region(addr) {
            Region::Vram(i) => self.vram[i],
            Region::Reg(reg, shift) => (self.load_reg(reg) >> shift) as u8,
            Region::Ram => self.ram.read_u8(addr),
        }
    }

    fn read_u16(&self, addr: u32) -> u16 {
        match Self::region(addr) {
            Region::Vram(i) if i + 1 < self.vram.len() => {
                u16::from_le_bytes([self.vram[i], self.vram[i + 1]])
            }
            Region::Reg(reg, shift) if shift <= 16 => (self.load_reg(reg) >> shift) as u16,
            _ => u16::from_le_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))]),
        }
    }

    fn read_u32(&self, addr: u32) -> u32 {
        match Self::region(addr) {
            Region::Reg(reg, 0) => self.load_reg(reg),
            _ => {
                let mut raw = [0u8; 4];
                self.read_block(addr, &mut raw);
                u32::from_le_bytes(raw)
            }
        }
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        match Self::region(addr) {
            Region::Vram(i) => self.vram[i] = value,
            Region::Reg(reg, shift) => {
                let word = (self.reg(reg) & !(0xFF << shift)) | (value as u32) << shift;
                self.store_reg(reg, word);
            }
            Region::Ram => self.ram.write_u8(addr, value),
        }
    }

    fn write_u16(&mut self, addr: u32, value: u16) {
        self.write_block(addr, &value.to_le_bytes());
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        match Self::region(addr) {
            Region::Reg(reg, 0) => self.store_reg(reg, value),
            _ => self.write_block(addr, &value.to_le_bytes()),
        }
    }
}
