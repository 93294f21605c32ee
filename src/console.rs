//! Console output over a serial port
//!
//! Formatted output goes through [`core::fmt::Write`] and turns every `\n`
//! into `\r\n`. Echo and escape sequences use the raw [`SerialPort`]
//! methods, which pass bytes through untouched.

use core::fmt;

use picomon_driver_traits::SerialPort;

/// Print to a [`Console`] without newline
#[macro_export]
macro_rules! console_print {
    ($con:expr, $($arg:tt)*) => {
        $con.print(format_args!($($arg)*))
    };
}

/// Print to a [`Console`] with newline
#[macro_export]
macro_rules! console_println {
    ($con:expr) => {
        $con.print(format_args!("\n"))
    };
    ($con:expr, $($arg:tt)*) => {
        {
            $con.print(format_args!($($arg)*));
            $con.print(format_args!("\n"));
        }
    };
}

pub struct Console<S: SerialPort> {
    port: S,
}

impl<S: SerialPort> Console<S> {
    pub fn new(port: S) -> Self {
        Console { port }
    }

    pub fn port(&self) -> &S {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut S {
        &mut self.port
    }

    pub fn into_inner(self) -> S {
        self.port
    }

    /// Write formatted text. The serial port cannot fail, so neither can this.
    pub fn print(&mut self, args: fmt::Arguments<'_>) {
        let _ = fmt::Write::write_fmt(self, args);
    }

    /// Wait for one key press
    pub fn read_key(&mut self) -> u8 {
        self.port.read_byte_blocking()
    }
}

impl<S: SerialPort> fmt::Write for Console<S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if b == b'\n' {
                self.port.write_byte(b'\r');
            }
            self.port.write_byte(b);
        }
        Ok(())
    }
}

impl<S: SerialPort> SerialPort for Console<S> {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.port.try_read_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        self.port.write_byte(byte)
    }

    fn read_byte_blocking(&mut self) -> u8 {
        self.port.read_byte_blocking()
    }
}
