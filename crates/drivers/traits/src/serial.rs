//! Serial console trait
//!
//! Implemented by the UART driver on target and by [`ScriptedSerial`]
//! in tests. Reads never block; the caller decides whether to spin.
//!
//! [`ScriptedSerial`]: crate::ScriptedSerial

/// Byte-oriented serial port
pub trait SerialPort {
    /// Fetch one received byte, or `None` if nothing is waiting.
    fn try_read_byte(&mut self) -> Option<u8>;

    /// Transmit one byte, untranslated.
    fn write_byte(&mut self, byte: u8);

    /// Transmit a run of bytes, untranslated.
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    /// Spin until a byte arrives.
    ///
    /// Only interactive viewers may call this; it has no upper bound.
    fn read_byte_blocking(&mut self) -> u8 {
        loop {
            if let Some(b) = self.try_read_byte() {
                return b;
            }
            core::hint::spin_loop();
        }
    }
}

impl<T: SerialPort + ?Sized> SerialPort for &mut T {
    fn try_read_byte(&mut self) -> Option<u8> {
        (**self).try_read_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes)
    }

    fn read_byte_blocking(&mut self) -> u8 {
        (**self).read_byte_blocking()
    }
}
