//! End-to-end runs of the polled monitor against in-memory hardware

use picomon::config::PROMPT;
use picomon::{dispatch, Monitor, MonitorConfig, Session};
use picomon_driver_traits::{PhysMemory, ScriptedSerial, SparseMemory};
use picomon_gpu::{GpuConfig, GpuReg, LCD_REG_BASE};
use picomon_readline::split;

type TestMonitor = Monitor<SparseMemory, ScriptedSerial>;

fn monitor_with(config: MonitorConfig) -> TestMonitor {
    Monitor::new(Session::new(SparseMemory::new(), ScriptedSerial::new(), config))
}

fn monitor() -> TestMonitor {
    monitor_with(MonitorConfig::default())
}

/// Queue `input` and poll until a command completes
fn run(m: &mut TestMonitor, input: &[u8]) -> i32 {
    m.session_mut().con.port_mut().push_input(input);
    for _ in 0..=input.len() + 1 {
        if let Some(status) = m.poll() {
            return status;
        }
    }
    panic!("no command completed for {:?}", String::from_utf8_lossy(input));
}

fn take_output(m: &mut TestMonitor) -> String {
    String::from_utf8(m.session_mut().con.port_mut().take_output()).unwrap()
}

#[test]
fn test_mw_mixed_hex_and_text() {
    let mut m = monitor();
    assert_eq!(run(&mut m, b"mw 0x40000000 41 42 \"hi\"\r"), 0);

    let mem = &m.session().mem;
    assert_eq!(mem.read_u8(0x4000_0000), 0x41);
    assert_eq!(mem.read_u8(0x4000_0001), 0x42);
    assert_eq!(mem.read_u8(0x4000_0002), b'h');
    assert_eq!(mem.read_u8(0x4000_0003), b'i');
    assert_eq!(mem.touched(), 4);

    let out = take_output(&mut m);
    assert!(out.contains("writing mem at addr 0x40000000 with 4 bytes:"));
    assert!(out.contains("0x41 0x42 0x68 0x69 "));
}

#[test]
fn test_unknown_command_leaves_memory_alone() {
    let mut m = monitor();
    assert_eq!(run(&mut m, b"poke 0x40000000 1\r"), -1);
    assert!(take_output(&mut m).contains("Command <poke> not found."));
    assert_eq!(m.session().mem.touched(), 0);
}

#[test]
fn test_byte_per_poll() {
    let mut m = monitor();
    let line = b"ver\r";
    for (i, &b) in line.iter().enumerate() {
        m.session_mut().con.port_mut().push_input(&[b]);
        let status = m.poll();
        if i + 1 < line.len() {
            assert_eq!(status, None);
        } else {
            assert_eq!(status, Some(0));
        }
    }
    let out = take_output(&mut m);
    assert!(out.starts_with(PROMPT));
    assert!(out.contains("ver\r\nPicoSoc mon ver=0.0.1\r\n"));
}

#[test]
fn test_editing_before_enter() {
    let mut m = monitor();
    // "vex", backspace, "r"; an arrow key sequence in between is dropped
    assert_eq!(run(&mut m, b"vex\x08\x1b[Ar\r"), 0);
    assert!(take_output(&mut m).contains("PicoSoc mon ver=0.0.1"));
}

#[test]
fn test_quoted_tokens() {
    let tokens = split("tt 10 20 \"hello world\"");
    assert_eq!(tokens.as_slice(), ["tt", "10", "20", "hello world"]);
    let tokens = split("  mw  1   'a b'  ");
    assert_eq!(tokens.as_slice(), ["mw", "1", "a b"]);
}

#[test]
fn test_line_command_draws_endpoints() {
    let mut m = monitor();
    assert_eq!(run(&mut m, b"line 0 0 9 4 red\r"), 0);
    let mem = &m.session().mem;
    let fb = MonitorConfig::default().fb0;
    let px = |x: u32, y: u32| mem.read_u16(fb + (y * 1024 + x) * 2);
    assert_eq!(px(0, 0), 0xF800);
    assert_eq!(px(9, 4), 0xF800);
    // One pixel per column on a shallow line
    assert_eq!(mem.touched(), 10 * 2);
}

#[test]
fn test_circle_command_is_symmetric() {
    let mut m = monitor();
    assert_eq!(run(&mut m, b"circle 100 100 8 white\r"), 0);
    let mem = &m.session().mem;
    let fb = MonitorConfig::default().fb0;
    let lit = |x: i32, y: i32| mem.read_u16(fb + (y as u32 * 1024 + x as u32) * 2) != 0;
    for (dx, dy) in [(8, 0), (0, 8), (-8, 0), (0, -8)] {
        assert!(lit(100 + dx, 100 + dy));
    }
    for y in 90..=110 {
        for x in 90..=110 {
            if lit(x, y) {
                assert!(lit(200 - x, y) && lit(x, 200 - y));
            }
        }
    }
    assert!(!lit(100, 100));
}

#[test]
fn test_gpu_timeout_clears_ctrlstat() {
    let config = MonitorConfig {
        gpu: GpuConfig {
            poll_limit: 20,
            ..GpuConfig::default()
        },
        ..MonitorConfig::default()
    };
    let mut m = monitor_with(config);
    // Plain memory echoes the busy bit back, so the engine never finishes
    assert_eq!(run(&mut m, b"rect 1 1 5 5\r"), 0);
    let ctrl = m.session().mem.read_u32(LCD_REG_BASE + GpuReg::CtrlStat.offset());
    assert_eq!(ctrl, 0);
    assert!(take_output(&mut m).contains("in 20 counts"));
}

#[test]
fn test_failed_command_status() {
    let mut m = monitor();
    let s = m.session_mut();
    assert_eq!(dispatch(s, &["mr"]), -1);
    assert_eq!(dispatch(s, &["pt", "1024", "0"]), -1);
    assert_eq!(dispatch(s, &["color", "mauve"]), -1);
    assert_eq!(dispatch(s, &[]), 0);
    assert_eq!(s.mem.touched(), 0);
}
