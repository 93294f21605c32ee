//! picomon - serial debug monitor for the PicoSoC LCD board
//!
//! The monitor reads commands from a UART one byte per poll, so it can
//! share a single thread with other polled work. Commands inspect and
//! patch physical memory and draw on the 1024x600 LCD either through the
//! software rasterizer or the memory-mapped GPU.
//!
//! ```rust,ignore
//! let session = Session::new(unsafe { Mmio::new() }, uart, MonitorConfig::default());
//! let mut monitor = Monitor::new(session);
//! loop {
//!     monitor.poll();
//! }
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod args;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod hexdump;
pub mod monitor;
pub mod session;

#[cfg(feature = "host")]
pub mod sim;

pub use commands::{dispatch, Command, CommandEntry, COMMANDS};
pub use config::MonitorConfig;
pub use console::Console;
pub use error::{CmdError, CmdResult};
pub use monitor::Monitor;
pub use session::Session;
