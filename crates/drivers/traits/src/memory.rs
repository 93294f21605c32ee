//! Physical memory access
//!
//! [`PhysMemory`] is the single capability through which the monitor reads
//! and writes arbitrary addresses. [`Mmio`] is the only implementation that
//! dereferences raw pointers; all address arithmetic above this layer stays
//! in plain integers.

use core::ptr::{read_volatile, write_volatile};

/// Read/write access to a 32-bit physical address space
///
/// Multi-byte accesses are little-endian. Callers that need natural
/// alignment mask the address themselves; implementations do not.
pub trait PhysMemory {
    fn read_u8(&self, addr: u32) -> u8;
    fn read_u16(&self, addr: u32) -> u16;
    fn read_u32(&self, addr: u32) -> u32;

    fn write_u8(&mut self, addr: u32, value: u8);
    fn write_u16(&mut self, addr: u32, value: u16);
    fn write_u32(&mut self, addr: u32, value: u32);

    /// Copy `buf.len()` bytes starting at `addr` into `buf`.
    fn read_block(&self, addr: u32, buf: &mut [u8]) {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.read_u8(addr.wrapping_add(i as u32));
        }
    }

    /// Copy `data` into memory starting at `addr`, one byte at a time.
    fn write_block(&mut self, addr: u32, data: &[u8]) {
        for (i, &b) in data.iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u32), b);
        }
    }
}

impl<T: PhysMemory + ?Sized> PhysMemory for &mut T {
    fn read_u8(&self, addr: u32) -> u8 {
        (**self).read_u8(addr)
    }

    fn read_u16(&self, addr: u32) -> u16 {
        (**self).read_u16(addr)
    }

    fn read_u32(&self, addr: u32) -> u32 {
        (**self).read_u32(addr)
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        (**self).write_u8(addr, value)
    }

    fn write_u16(&mut self, addr: u32, value: u16) {
        (**self).write_u16(addr, value)
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        (**self).write_u32(addr, value)
    }
}

/// Direct volatile access to the physical address space
///
/// An out-of-range address faults at the bus level; nothing here checks
/// addresses against a memory map.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Create the memory capability.
    ///
    /// # Safety
    /// The caller must be running with the physical address space identity
    /// mapped, and must accept that every address handed to this object is
    /// dereferenced as-is.
    pub const unsafe fn new() -> Self {
        Mmio { _private: () }
    }
}

impl PhysMemory for Mmio {
    fn read_u8(&self, addr: u32) -> u8 {
        unsafe { read_volatile(addr as usize as *const u8) }
    }

    fn read_u16(&self, addr: u32) -> u16 {
        unsafe { read_volatile(addr as usize as *const u16) }
    }

    fn read_u32(&self, addr: u32) -> u32 {
        unsafe { read_volatile(addr as usize as *const u32) }
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        unsafe { write_volatile(addr as usize as *mut u8, value) }
    }

    fn write_u16(&mut self, addr: u32, value: u16) {
        unsafe { write_volatile(addr as usize as *mut u16, value) }
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        unsafe { write_volatile(addr as usize as *mut u32, value) }
    }
}
