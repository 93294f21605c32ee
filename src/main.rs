//! picomon host simulator
//!
//! Runs the monitor on stdin/stdout against a simulated board: sparse RAM,
//! both LCD framebuffers and a drawing engine that executes GPU commands
//! in place. Put the terminal in raw mode (`stty raw -echo`) to get the
//! same byte-at-a-time feel as the UART.

use std::fs::File;
use std::io::{self, BufWriter, Read, Stdout, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use picomon::config::BANNER;
use picomon::sim::SimBus;
use picomon::{console_print, Monitor, MonitorConfig, Session};
use picomon_driver_traits::SerialPort;
use picomon_gpu::gpu::POLL_LIMIT;
use picomon_gpu::GpuConfig;

/// Idle time between polls when no input is waiting
const IDLE: Duration = Duration::from_millis(2);

#[derive(Parser)]
#[command(name = "picomon")]
#[command(about = "PicoSoC debug monitor on a simulated board", long_about = None)]
struct Cli {
    /// Log filter for stderr, e.g. "debug" or "warn,picomon_gpu=debug"
    #[arg(short, long, default_value = "warn")]
    log: String,

    /// Busy-bit reads before a GPU operation is abandoned
    #[arg(long, default_value_t = POLL_LIMIT)]
    poll_limit: u32,

    /// Status reads the simulated GPU stays busy after each trigger
    #[arg(long, default_value_t = 0)]
    gpu_latency: u32,

    /// Write the displayed framebuffer to FILE (binary PPM) on exit
    #[arg(short, long, value_name = "FILE")]
    screenshot: Option<PathBuf>,

    /// Skip the start-up banner
    #[arg(short, long)]
    quiet: bool,
}

/// Serial port over the process's stdin/stdout
struct StdioSerial {
    rx: Receiver<u8>,
    out: Stdout,
    eof: bool,
}

impl StdioSerial {
    fn new() -> Self {
        StdioSerial {
            rx: spawn_reader(),
            out: io::stdout(),
            eof: false,
        }
    }

    fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

/// Feed stdin to the monitor one byte at a time from a reader thread.
fn spawn_reader() -> Receiver<u8> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut stdin = io::stdin().lock();
        let mut buf = [0u8; 256];
        loop {
            let n = match stdin.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            for &b in &buf[..n] {
                if tx.send(b).is_err() {
                    return;
                }
            }
        }
    });
    rx
}

impl SerialPort for StdioSerial {
    fn try_read_byte(&mut self) -> Option<u8> {
        match self.rx.try_recv() {
            Ok(b) => Some(b),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.eof = true;
                None
            }
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let _ = self.out.write_all(&[byte]);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let _ = self.out.write_all(bytes);
    }

    /// Pager keys. End of input answers 'q' so a piped script cannot hang.
    fn read_byte_blocking(&mut self) -> u8 {
        self.flush();
        match self.rx.recv() {
            Ok(b) => b,
            Err(_) => {
                self.eof = true;
                b'q'
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .parse_filters(&cli.log)
        .format_timestamp(None)
        .init();

    let config = MonitorConfig {
        gpu: GpuConfig {
            poll_limit: cli.poll_limit,
            ..GpuConfig::default()
        },
        ..MonitorConfig::default()
    };
    info!(
        "simulated board: poll limit {}, gpu latency {}",
        cli.poll_limit, cli.gpu_latency
    );

    let mut session = Session::new(SimBus::new(cli.gpu_latency), StdioSerial::new(), config);
    if !cli.quiet {
        console_print!(session.con, "{}", BANNER);
    }

    let mut monitor = Monitor::new(session);
    loop {
        match monitor.poll() {
            Some(status) => debug!("command finished with {}", status),
            None => {
                let port = monitor.session_mut().con.port_mut();
                if port.eof {
                    break;
                }
                port.flush();
                thread::sleep(IDLE);
            }
        }
    }

    let mut session = monitor.into_session();
    console_print!(session.con, "\n");
    session.con.port_mut().flush();

    if let Some(path) = cli.screenshot {
        let file = File::create(&path)
            .with_context(|| format!("creating screenshot {}", path.display()))?;
        let mut out = BufWriter::new(file);
        session.mem.screenshot(&mut out)?;
        out.flush()?;
        info!(
            "wrote {} after {} gpu operations",
            path.display(),
            session.mem.executed()
        );
    }
    Ok(())
}
