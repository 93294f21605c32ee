//! Heap-backed stand-ins for hardware
//!
//! Used by unit tests across the workspace and by the host simulator.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;

use crate::{PhysMemory, SerialPort};

/// Sparse byte-addressed memory; unwritten bytes read as zero.
#[derive(Debug, Clone, Default)]
pub struct SparseMemory {
    bytes: BTreeMap<u32, u8>,
}

impl SparseMemory {
    pub fn new() -> Self {
        SparseMemory { bytes: BTreeMap::new() }
    }

    /// Number of distinct bytes ever written
    pub fn touched(&self) -> usize {
        self.bytes.len()
    }

    /// Iterate written bytes in address order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.bytes.iter().map(|(&a, &b)| (a, b))
    }
}

impl PhysMemory for SparseMemory {
    fn read_u8(&self, addr: u32) -> u8 {
        self.bytes.get(&addr).copied().unwrap_or(0)
    }

    fn read_u16(&self, addr: u32) -> u16 {
        u16::from_le_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))])
    }

    fn read_u32(&self, addr: u32) -> u32 {
        let mut raw = [0u8; 4];
        self.read_block(addr, &mut raw);
        u32::from_le_bytes(raw)
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        self.bytes.insert(addr, value);
    }

    fn write_u16(&mut self, addr: u32, value: u16) {
        self.write_block(addr, &value.to_le_bytes());
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        self.write_block(addr, &value.to_le_bytes());
    }
}

/// Serial port fed from a queue, capturing everything written.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSerial {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl ScriptedSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Port with `input` already queued
    pub fn with_input(input: &[u8]) -> Self {
        let mut port = Self::new();
        port.push_input(input);
        port
    }

    /// Queue more received bytes
    pub fn push_input(&mut self, input: &[u8]) {
        self.input.extend(input.iter().copied());
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Output decoded lossily as text
    pub fn output_text(&self) -> alloc::string::String {
        alloc::string::String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Take and clear captured output
    pub fn take_output(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.output)
    }
}

impl SerialPort for ScriptedSerial {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }

    /// A script that runs dry would otherwise spin forever.
    fn read_byte_blocking(&mut self) -> u8 {
        match self.input.pop_front() {
            Some(b) => b,
            None => panic!("ScriptedSerial: blocking read with no input queued"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_memory_little_endian() {
        let mut mem = SparseMemory::new();
        mem.write_u32(0x1000, 0x1122_3344);
        assert_eq!(mem.read_u8(0x1000), 0x44);
        assert_eq!(mem.read_u8(0x1003), 0x11);
        assert_eq!(mem.read_u16(0x1002), 0x1122);
        assert_eq!(mem.read_u32(0x1000), 0x1122_3344);
    }

    #[test]
    fn test_sparse_memory_unwritten_reads_zero() {
        let mem = SparseMemory::new();
        assert_eq!(mem.read_u32(0xC000_0000), 0);
        assert_eq!(mem.touched(), 0);
    }

    #[test]
    fn test_read_block_wraps_address() {
        let mut mem = SparseMemory::new();
        mem.write_u8(0xFFFF_FFFF, 0xAA);
        mem.write_u8(0, 0xBB);
        let mut buf = [0u8; 2];
        mem.read_block(0xFFFF_FFFF, &mut buf);
        assert_eq!(buf, [0xAA, 0xBB]);
    }

    #[test]
    fn test_scripted_serial() {
        let mut port = ScriptedSerial::with_input(b"ab");
        assert_eq!(port.try_read_byte(), Some(b'a'));
        assert_eq!(port.read_byte_blocking(), b'b');
        assert_eq!(port.try_read_byte(), None);
        port.write_bytes(b"ok");
        assert_eq!(port.output(), b"ok");
        assert_eq!(port.take_output(), b"ok".to_vec());
        assert!(port.output().is_empty());
    }
}
