//! GPU command channel
//!
//! The drawing engine is driven through seven 32-bit registers. An
//! operation is issued by loading the operand registers, writing the
//! opcode with the trigger bit into `ctrlstat`, polling the busy bit for a
//! bounded number of reads and finally clearing `ctrlstat`. Only one
//! operation is ever outstanding.

use bitflags::bitflags;
use log::{debug, warn};
use picomon_driver_traits::{DriverError, DriverResult, PhysMemory};

use crate::color::Color;
use crate::LCD_REG_BASE;

/// Default number of busy-bit reads before giving up
pub const POLL_LIMIT: u32 = 10_000;

/// Opcode field position in `ctrlstat`
const OP_SHIFT: u32 = 1;

/// GPU registers, in index order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuReg {
    CtrlStat = 0,
    DispAddr = 1,
    WorkAddr = 2,
    Color = 3,
    X0Y0 = 4,
    X1Y1 = 5,
    Size = 6,
}

impl GpuReg {
    pub const ALL: [GpuReg; 7] = [
        GpuReg::CtrlStat,
        GpuReg::DispAddr,
        GpuReg::WorkAddr,
        GpuReg::Color,
        GpuReg::X0Y0,
        GpuReg::X1Y1,
        GpuReg::Size,
    ];

    pub fn from_index(index: u32) -> DriverResult<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(DriverError::OutOfRange)
    }

    /// Register by name, ignoring case
    pub fn from_name(name: &str) -> DriverResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|reg| reg.name().eq_ignore_ascii_case(name))
            .ok_or(DriverError::InvalidParameter)
    }

    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Byte offset from the register base
    pub const fn offset(self) -> u32 {
        self.index() * 4
    }

    pub const fn name(self) -> &'static str {
        match self {
            GpuReg::CtrlStat => "ctrlstat",
            GpuReg::DispAddr => "dispaddr",
            GpuReg::WorkAddr => "workaddr",
            GpuReg::Color => "color",
            GpuReg::X0Y0 => "x0y0",
            GpuReg::X1Y1 => "x1y1",
            GpuReg::Size => "size",
        }
    }
}

bitflags! {
    /// Control/status register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CtrlStat: u32 {
        /// Start the loaded operation
        const TRIGGER = 1 << 0;
        /// Engine is executing an operation
        const BUSY    = 1 << 1;
    }
}

/// Drawing engine operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum GpuOp {
    /// Fill the work buffer with `color`
    SetBackground = 1,
    /// Plot `color` at `x0y0`
    SetPoint = 2,
    /// Fill the rectangle spanned by `x0y0` and `x1y1`
    FillRect = 3,
}

impl GpuOp {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(GpuOp::SetBackground),
            2 => Some(GpuOp::SetPoint),
            3 => Some(GpuOp::FillRect),
            _ => None,
        }
    }

    /// Value written to `ctrlstat` to start this operation
    pub const fn command(self) -> u32 {
        ((self as u32) << OP_SHIFT) | CtrlStat::TRIGGER.bits()
    }

    /// Decode an operation from a `ctrlstat` write
    pub fn decode(ctrl: u32) -> Option<Self> {
        if ctrl & CtrlStat::TRIGGER.bits() == 0 {
            return None;
        }
        Self::from_code(ctrl >> OP_SHIFT)
    }
}

/// Pack a coordinate pair into a point register
pub const fn pack_point(x: i32, y: i32) -> u32 {
    ((x as u32) & 0xFFFF) | (((y as u32) & 0xFFFF) << 16)
}

/// Split a point register into (x, y)
pub const fn unpack_point(value: u32) -> (u16, u16) {
    ((value & 0xFFFF) as u16, (value >> 16) as u16)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuConfig {
    /// Register block base address
    pub base: u32,
    /// Bit(s) of `ctrlstat` that read as set while the engine works
    pub busy: CtrlStat,
    /// Busy-bit reads before an operation is abandoned
    pub poll_limit: u32,
}

impl Default for GpuConfig {
    fn default() -> Self {
        GpuConfig {
            base: LCD_REG_BASE,
            busy: CtrlStat::BUSY,
            poll_limit: POLL_LIMIT,
        }
    }
}

/// How an issued operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuOutcome {
    /// Busy cleared after `polls` reads
    Completed { polls: u32 },
    /// Busy still set after the poll limit; the operation is assumed done
    TimedOut,
}

impl GpuOutcome {
    pub fn polls(self, limit: u32) -> u32 {
        match self {
            GpuOutcome::Completed { polls } => polls,
            GpuOutcome::TimedOut => limit,
        }
    }
}

/// Register-level driver for the drawing engine
pub struct Gpu<M: PhysMemory> {
    mem: M,
    config: GpuConfig,
}

impl<M: PhysMemory> Gpu<M> {
    pub fn new(mem: M, config: GpuConfig) -> Self {
        Gpu { mem, config }
    }

    pub fn config(&self) -> &GpuConfig {
        &self.config
    }

    pub fn into_inner(self) -> M {
        self.mem
    }

    pub fn read_reg(&self, reg: GpuReg) -> u32 {
        self.mem.read_u32(self.config.base + reg.offset())
    }

    pub fn write_reg(&mut self, reg: GpuReg, value: u32) {
        self.mem.write_u32(self.config.base + reg.offset(), value);
    }

    pub fn status(&self) -> CtrlStat {
        CtrlStat::from_bits_retain(self.read_reg(GpuReg::CtrlStat))
    }

    pub fn is_busy(&self) -> bool {
        self.status().intersects(self.config.busy)
    }

    /// Leave `ctrlstat` idle
    pub fn clear(&mut self) {
        self.write_reg(GpuReg::CtrlStat, 0);
    }

    /// Start `op` with operands already loaded and wait it out.
    ///
    /// `ctrlstat` is cleared afterwards whether or not busy dropped.
    pub fn issue(&mut self, op: GpuOp) -> GpuOutcome {
        self.clear();
        self.write_reg(GpuReg::CtrlStat, op.command());

        let mut outcome = GpuOutcome::TimedOut;
        for polls in 0..self.config.poll_limit {
            if !self.is_busy() {
                outcome = GpuOutcome::Completed { polls };
                break;
            }
        }
        self.clear();

        match outcome {
            GpuOutcome::Completed { polls } => debug!("gpu: {:?} done after {} polls", op, polls),
            GpuOutcome::TimedOut => warn!(
                "gpu: {:?} still busy after {} polls, continuing",
                op, self.config.poll_limit
            ),
        }
        outcome
    }

    /// Fill the buffer at `work_addr` with `color`.
    ///
    /// The work-address and color registers are restored afterwards.
    pub fn fill(&mut self, work_addr: u32, color: Color) -> GpuOutcome {
        let saved_work = self.read_reg(GpuReg::WorkAddr);
        let saved_color = self.read_reg(GpuReg::Color);

        self.write_reg(GpuReg::WorkAddr, work_addr);
        self.write_reg(GpuReg::Color, color.to_u32());
        let outcome = self.issue(GpuOp::SetBackground);

        self.write_reg(GpuReg::WorkAddr, saved_work);
        self.write_reg(GpuReg::Color, saved_color);
        outcome
    }

    pub fn point(&mut self, x: i32, y: i32, color: Color) -> GpuOutcome {
        self.write_reg(GpuReg::Color, color.to_u32());
        self.write_reg(GpuReg::X0Y0, pack_point(x, y));
        self.issue(GpuOp::SetPoint)
    }

    /// Filled rectangle with opposite corners (x0, y0) and (x1, y1)
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> GpuOutcome {
        self.write_reg(GpuReg::Color, color.to_u32());
        self.write_reg(GpuReg::X0Y0, pack_point(x0, y0));
        self.write_reg(GpuReg::X1Y1, pack_point(x1, y1));
        self.issue(GpuOp::FillRect)
    }
}
