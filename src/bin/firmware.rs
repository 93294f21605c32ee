//! Board image: the monitor on UART0 with the LCD behind direct MMIO
//!
//! Build for `riscv32imac-unknown-none-elf` with `--features firmware`.
//! The reset stub in flash sets up the stack, `.data` and `.bss`, then
//! jumps to `main`.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod board {
    use core::panic::PanicInfo;

    use log::{LevelFilter, Log, Metadata, Record};
    use picomon::config::{BANNER, UART_BASE};
    use picomon::{console_print, console_println, Console, Monitor, MonitorConfig, Session};
    use picomon_driver_traits::{Mmio, PhysMemory, SerialPort};
    use spin::Mutex;

    /// PicoSoC simple UART. The data register reads as -1 while the
    /// receive FIFO is empty.
    pub struct Uart {
        mem: Mmio,
    }

    impl Uart {
        pub const fn new() -> Self {
            Uart {
                mem: unsafe { Mmio::new() },
            }
        }
    }

    impl SerialPort for Uart {
        fn try_read_byte(&mut self) -> Option<u8> {
            let data = self.mem.read_u32(UART_BASE) as i32;
            if data < 0 {
                None
            } else {
                Some(data as u8)
            }
        }

        fn write_byte(&mut self, byte: u8) {
            self.mem.write_u32(UART_BASE, byte as u32);
        }
    }

    /// Log records go out on the same UART as the monitor.
    struct UartLogger {
        uart: Mutex<Uart>,
    }

    static LOGGER: UartLogger = UartLogger {
        uart: Mutex::new(Uart::new()),
    };

    /// Debug output for the subsystems selected at build time, warnings
    /// and errors for everything else.
    fn target_level(target: &str) -> LevelFilter {
        let cli = target.starts_with("picomon::") || target.starts_with("picomon_readline");
        if cfg!(feature = "debug-cli") && cli {
            return LevelFilter::Debug;
        }
        if cfg!(feature = "debug-gpu") && target.starts_with("picomon_gpu") {
            return LevelFilter::Debug;
        }
        LevelFilter::Warn
    }

    impl Log for UartLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= target_level(metadata.target())
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let mut uart = self.uart.lock();
            let mut con = Console::new(&mut *uart);
            console_println!(con, "[{}] {}: {}", record.level(), record.target(), record.args());
        }

        fn flush(&self) {}
    }

    fn init_logging() {
        let max = if cfg!(any(feature = "debug-cli", feature = "debug-gpu")) {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(max);
        }
    }

    #[no_mangle]
    pub extern "C" fn main() -> ! {
        init_logging();

        let config = MonitorConfig::default();
        let mut session = Session::new(unsafe { Mmio::new() }, Uart::new(), config);
        console_print!(session.con, "\n\n{}", BANNER);
        console_println!(session.con, "    picomon ready, type help\n");

        let mut monitor = Monitor::new(session);
        loop {
            monitor.poll();
        }
    }

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        let mut con = Console::new(Uart::new());
        console_println!(con, "\nPANIC: {}", info);
        loop {
            core::hint::spin_loop();
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("picomon-fw runs on the board; use the `picomon` binary to simulate");
}
