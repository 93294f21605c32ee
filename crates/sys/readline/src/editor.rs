//! Non-blocking line editor
//!
//! [`LineEditor::poll_line`] drains whatever the serial port has buffered and
//! returns as soon as the port runs dry, so it can sit inside a polling
//! loop next to other work. A finished line stays in the buffer until
//! [`LineEditor::reset`] is called.

use picomon_driver_traits::SerialPort;

use crate::key::{classify, EscapeState, Key};

/// Default line buffer size; one byte is reserved, so lines hold 127 chars.
pub const LINE_MAX: usize = 128;

const ERASE: &[u8] = b"\x08 \x08";
const NEWLINE: &[u8] = b"\r\n";

/// Fixed-capacity line editor
pub struct LineEditor<const N: usize = LINE_MAX> {
    buf: [u8; N],
    len: usize,
    escape: EscapeState,
}

impl<const N: usize> LineEditor<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            escape: EscapeState::Idle,
        }
    }

    /// Maximum number of characters a line can hold
    pub const fn capacity(&self) -> usize {
        N.saturating_sub(1)
    }

    /// Consume available input bytes.
    ///
    /// Returns `Some(len)` when a CR or LF completes the line, leaving any
    /// further input unread. Returns `None` once the port has nothing more.
    pub fn poll_line<S: SerialPort + ?Sized>(&mut self, port: &mut S) -> Option<usize> {
        while let Some(byte) = port.try_read_byte() {
            if self.feed(byte, port) {
                return Some(self.len);
            }
        }
        None
    }

    /// Apply one byte; true when it terminated the line.
    fn feed<S: SerialPort + ?Sized>(&mut self, byte: u8, port: &mut S) -> bool {
        match classify(byte) {
            Key::Enter => {
                port.write_bytes(NEWLINE);
                self.escape = EscapeState::Idle;
                log::trace!("line complete, {} chars", self.len);
                return true;
            }
            Key::Escape => {
                self.escape = self.escape.toggle();
            }
            Key::Backspace if self.escape.is_pending() => {
                self.escape = EscapeState::Idle;
            }
            Key::Backspace => {
                if self.len > 0 {
                    self.len -= 1;
                    port.write_bytes(ERASE);
                }
            }
            _ if self.escape == EscapeState::SawEscape => {
                self.escape = EscapeState::SawEscapeSecondByte;
            }
            _ if self.escape == EscapeState::SawEscapeSecondByte => {
                self.escape = EscapeState::Idle;
            }
            Key::Char(c) => {
                if self.len < self.capacity() {
                    self.buf[self.len] = c;
                    self.len += 1;
                    port.write_byte(c);
                }
            }
            Key::Other(b) => {
                log::trace!("dropped input byte {:#04x}", b);
            }
        }
        false
    }

    /// Current line contents
    pub fn line(&self) -> &str {
        // Only printable ASCII is ever stored
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn escape_state(&self) -> EscapeState {
        self.escape
    }

    /// Discard the line and any pending escape sequence
    pub fn reset(&mut self) {
        self.len = 0;
        self.escape = EscapeState::Idle;
    }
}

impl<const N: usize> Default for LineEditor<N> {
    fn default() -> Self {
        Self::new()
    }
}
