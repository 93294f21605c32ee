//! Hardware Access Traits for picomon
//!
//! This crate defines the narrow interfaces the monitor uses to reach
//! hardware. Everything above it (line editor, command handlers, graphics)
//! is written against these traits and never touches a raw address.
//!
//! - [`SerialPort`]: byte-at-a-time console I/O with a non-blocking read
//! - [`PhysMemory`]: read/write at a physical address
//! - [`Mmio`]: the volatile implementation of [`PhysMemory`]
//!
//! # Features
//!
//! - `alloc`: heap-backed doubles ([`SparseMemory`], [`ScriptedSerial`])
//!   for tests and the host simulator

#![cfg_attr(not(test), no_std)]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

pub mod memory;
pub mod serial;

#[cfg(any(test, feature = "alloc"))]
mod doubles;

pub use memory::{Mmio, PhysMemory};
pub use serial::SerialPort;

#[cfg(any(test, feature = "alloc"))]
pub use doubles::{ScriptedSerial, SparseMemory};

/// Common error type for driver operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// Invalid parameter
    InvalidParameter,
    /// Index or coordinate outside the device's range
    OutOfRange,
}

pub type DriverResult<T> = Result<T, DriverError>;

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::InvalidParameter => f.write_str("invalid parameter"),
            DriverError::OutOfRange => f.write_str("out of range"),
        }
    }
}
