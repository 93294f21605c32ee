//! greg, clg, pt, line, rect, circle, color, tt
//!
//! Coordinates are checked against the panel size before anything is
//! drawn. Drawing commands without a color argument use the session
//! color set by `color`.

use picomon_driver_traits::{PhysMemory, SerialPort};
use picomon_gpu::{Color, Font, GpuReg, NAMED_COLORS};

use crate::args::{find_opt, format_bits, parse_i32, parse_u32};
use crate::error::{CmdError, CmdResult};
use crate::session::Session;
use crate::{console_print, console_println};

const GREG_USAGE: &str =
    "[-ha] [<regidx|name> [<value>]]\n    -h this help\n    -a show all registers";
const CLG_USAGE: &str = "[-0|-1] [-s] [ARGB in 32-bit hex | colorname]";
const PT_USAGE: &str = "[-s] <x> <y>\n    -s use software drawpoint";
const LINE_USAGE: &str = "<x0> <y0> <x1> <y1> [ARGB in hex | colorname]";
const RECT_USAGE: &str = "<x0> <y0> <x1> <y1>";
const CIRCLE_USAGE: &str = "<x0> <y0> <radius> [ARGB in hex | colorname]";
const COLOR_USAGE: &str = "[-h][-l] [ARGB in 32-bit hex | colorname]\n    \
    no args shows current color setting\n    -h this help\n    -l show colors";
const TT_USAGE: &str = "<x> <y> \"any text\"";

/// Parse a coordinate and require `0 <= v < limit`
fn coord(arg: &str, limit: u32, what: &'static str, usage: &'static str) -> Result<i32, CmdError> {
    let v = parse_i32(arg).ok_or(CmdError::Usage(usage))?;
    if v < 0 || v as u32 >= limit {
        return Err(CmdError::Range(what));
    }
    Ok(v)
}

fn color_arg(args: &[&str], position: usize) -> Result<Color, CmdError> {
    Color::parse(args[position]).ok_or(CmdError::Lookup {
        what: "color",
        position,
    })
}

fn print_reg<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, reg: GpuReg) {
    let value = s.gpu().read_reg(reg);
    console_print!(
        s.con,
        "reg {}: {:<8} (0x{:02X}): 0x{:08X}",
        reg.index(),
        reg.name(),
        reg.offset(),
        value
    );
    if reg == GpuReg::CtrlStat {
        console_print!(s.con, "  [{}]", format_bits(value, 0, 8, 4));
    }
    console_println!(s.con);
}

/// Register by index (0-6) or name
fn resolve_reg(args: &[&str], position: usize) -> Result<GpuReg, CmdError> {
    match parse_u32(args[position]) {
        Some(index) => GpuReg::from_index(index).map_err(|_| CmdError::Range("register index")),
        None => GpuReg::from_name(args[position]).map_err(|_| CmdError::Lookup {
            what: "register",
            position,
        }),
    }
}

pub(super) fn gpu_reg<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    if find_opt(args, "-h").is_some() {
        return Err(CmdError::Usage(GREG_USAGE));
    }
    if find_opt(args, "-a").is_some() || args.len() < 2 {
        for reg in GpuReg::ALL {
            print_reg(s, reg);
        }
        return Ok(());
    }

    let reg = resolve_reg(args, 1)?;
    match args.len() {
        2 => {}
        3 => {
            let value = parse_u32(args[2]).ok_or(CmdError::Usage(GREG_USAGE))?;
            s.gpu().write_reg(reg, value);
        }
        _ => return Err(CmdError::Usage(GREG_USAGE)),
    }
    print_reg(s, reg);
    Ok(())
}

pub(super) fn clear<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    if find_opt(args, "-h").is_some() {
        return Err(CmdError::Usage(CLG_USAGE));
    }
    let software = find_opt(args, "-s").is_some();
    let frame = if find_opt(args, "-1").is_some() {
        s.config.fb1
    } else {
        s.config.fb0
    };

    let last = args.len() - 1;
    let color = if last > 0 && !args[last].starts_with('-') {
        color_arg(args, last)?
    } else {
        s.color
    };

    if software {
        s.raster_at(frame).fill(color);
        console_println!(s.con, "{}: cleared screen in software", args[0]);
    } else {
        let outcome = s.gpu().fill(frame, color);
        let polls = outcome.polls(s.config.gpu.poll_limit);
        console_println!(s.con, "{}: cleared screen in {} counts", args[0], polls);
    }
    Ok(())
}

pub(super) fn point<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    if find_opt(args, "-h").is_some() {
        return Err(CmdError::Usage(PT_USAGE));
    }
    let software = find_opt(args, "-s").is_some();
    if args.len() < 3 + software as usize {
        return Err(CmdError::Usage(PT_USAGE));
    }

    let n = args.len();
    let x = coord(args[n - 2], s.config.width, "x", PT_USAGE)?;
    let y = coord(args[n - 1], s.config.height, "y", PT_USAGE)?;
    let color = s.color;
    console_println!(s.con, "drawing point ({}, {}) with 0x{:08X}", x, y, color.0);

    if software {
        s.raster().plot_point(x, y, color);
    } else {
        s.gpu().point(x, y, color);
    }
    Ok(())
}

/// Four corner coordinates from args[1..=4]
fn corners<M: PhysMemory, S: SerialPort>(
    s: &Session<M, S>,
    args: &[&str],
    usage: &'static str,
) -> Result<[i32; 4], CmdError> {
    if args.len() < 5 {
        return Err(CmdError::Usage(usage));
    }
    let (w, h) = (s.config.width, s.config.height);
    Ok([
        coord(args[1], w, "x0", usage)?,
        coord(args[2], h, "y0", usage)?,
        coord(args[3], w, "x1", usage)?,
        coord(args[4], h, "y1", usage)?,
    ])
}

pub(super) fn line<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    let [x0, y0, x1, y1] = corners(s, args, LINE_USAGE)?;
    let color = if args.len() > 5 {
        color_arg(args, 5)?
    } else {
        s.color
    };

    console_println!(
        s.con,
        "drawing line from ({}, {}) to ({}, {}) with 0x{:08X}",
        x0,
        y0,
        x1,
        y1,
        color.0
    );
    s.raster().plot_line(x0, y0, x1, y1, color);
    Ok(())
}

pub(super) fn rect<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    let [x0, y0, x1, y1] = corners(s, args, RECT_USAGE)?;
    let color = s.color;

    let outcome = s.gpu().fill_rect(x0, y0, x1, y1, color);
    let polls = outcome.polls(s.config.gpu.poll_limit);
    console_println!(
        s.con,
        "drawn filled rect from ({}, {}) to ({}, {}) with #{:08X} {} in {} counts",
        x0,
        y0,
        x1,
        y1,
        color.0,
        color.name().unwrap_or(""),
        polls
    );
    Ok(())
}

pub(super) fn circle<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    if args.len() < 4 {
        return Err(CmdError::Usage(CIRCLE_USAGE));
    }
    let x0 = coord(args[1], s.config.width, "x0", CIRCLE_USAGE)?;
    let y0 = coord(args[2], s.config.height, "y0", CIRCLE_USAGE)?;
    let r = coord(args[3], s.config.width, "radius", CIRCLE_USAGE)?;
    let color = if args.len() > 4 {
        color_arg(args, 4)?
    } else {
        s.color
    };

    console_println!(
        s.con,
        "drawing circle at ({}, {}) with radius {} with 0x{:08X}",
        x0,
        y0,
        r,
        color.0
    );
    s.raster().plot_circle(x0, y0, r, color);
    Ok(())
}

fn list_colors<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>) {
    console_println!(s.con, "Available colors:");
    for (i, (name, _)) in NAMED_COLORS.iter().enumerate() {
        if i > 0 {
            console_print!(s.con, ", ");
        }
        console_print!(s.con, "{}", name);
    }
    console_println!(s.con);
}

pub(super) fn set_color<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    if find_opt(args, "-l").is_some() {
        list_colors(s);
        return Ok(());
    }
    if find_opt(args, "-h").is_some() {
        return Err(CmdError::Usage(COLOR_USAGE));
    }

    if args.len() == 1 {
        let current = s.color;
        console_println!(s.con, "#{:08X} {}", current.0, current.name().unwrap_or(""));
        return Ok(());
    }

    let color = Color::parse(args[1]).ok_or(CmdError::Lookup {
        what: "Hexcolor or Colorname",
        position: 1,
    })?;
    console_println!(s.con, "Setting color to 0x{:08X}", color.0);
    s.color = color;
    s.gpu().write_reg(GpuReg::Color, color.to_u32());
    Ok(())
}

pub(super) fn text<M: PhysMemory, S: SerialPort>(s: &mut Session<M, S>, args: &[&str]) -> CmdResult {
    if args.len() != 4 || find_opt(args, "-h").is_some() {
        return Err(CmdError::Usage(TT_USAGE));
    }
    let x = coord(args[1], s.config.width, "x", TT_USAGE)?;
    let y = coord(args[2], s.config.height, "y", TT_USAGE)?;
    let color = s.color;

    console_println!(s.con, "drawing text \"{}\" at ({}, {})", args[3], x, y);
    s.raster().draw_text(x, y, Font::Proportional, args[3], color);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::dispatch;
    use crate::config::MonitorConfig;
    use picomon_driver_traits::{ScriptedSerial, SparseMemory};
    use picomon_gpu::{pack_point, GpuConfig, LCD_REG_BASE};

    /// 16x8 panel so software fills stay small
    fn small() -> MonitorConfig {
        MonitorConfig {
            width: 16,
            height: 8,
            fb0: 0x1000,
            fb1: 0x1100,
            gpu: GpuConfig {
                poll_limit: 50,
                ..GpuConfig::default()
            },
            ..MonitorConfig::default()
        }
    }

    fn session() -> Session<SparseMemory, ScriptedSerial> {
        Session::new(SparseMemory::new(), ScriptedSerial::new(), small())
    }

    fn out(s: &mut Session<SparseMemory, ScriptedSerial>) -> String {
        let bytes = s.con.port_mut().take_output();
        String::from_utf8(bytes).unwrap()
    }

    fn reg(s: &Session<SparseMemory, ScriptedSerial>, r: GpuReg) -> u32 {
        s.mem.read_u32(LCD_REG_BASE + r.offset())
    }

    fn pixel(s: &Session<SparseMemory, ScriptedSerial>, base: u32, x: u32, y: u32) -> u16 {
        s.mem.read_u16(base + (y * 16 + x) * 2)
    }

    #[test]
    fn test_greg_all() {
        let mut s = session();
        s.mem.write_u32(LCD_REG_BASE + 0x0C, 0xFF00FF);
        assert_eq!(dispatch(&mut s, &["greg"]), 0);
        let text = out(&mut s);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "reg 0: ctrlstat (0x00): 0x00000000  [0000 0000]");
        assert_eq!(lines[3], "reg 3: color    (0x0C): 0x00FF00FF");
        assert_eq!(lines[6], "reg 6: size     (0x18): 0x00000000");

        assert_eq!(dispatch(&mut s, &["greg", "-a", "1"]), 0);
        assert_eq!(out(&mut s).lines().count(), 7);
    }

    #[test]
    fn test_greg_write_by_index_and_name() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["greg", "2", "0xC012C000"]), 0);
        assert_eq!(reg(&s, GpuReg::WorkAddr), 0xC012_C000);
        assert_eq!(out(&mut s), "reg 2: workaddr (0x08): 0xC012C000\r\n");

        assert_eq!(dispatch(&mut s, &["greg", "X1Y1", "0x00100020"]), 0);
        assert_eq!(reg(&s, GpuReg::X1Y1), 0x0010_0020);

        assert_eq!(dispatch(&mut s, &["greg", "size"]), 0);
        assert!(out(&mut s).ends_with("reg 6: size     (0x18): 0x00000000\r\n"));
    }

    #[test]
    fn test_greg_errors() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["greg", "7", "1"]), -1);
        assert_eq!(out(&mut s), "greg: register index out of range\r\n");
        assert_eq!(dispatch(&mut s, &["greg", "bogus", "1"]), -1);
        assert_eq!(out(&mut s), "greg: register bogus not found\r\n");
        assert_eq!(dispatch(&mut s, &["greg", "1", "zz"]), -1);
        assert!(out(&mut s).starts_with("Usage: greg [-ha]"));
        assert_eq!(dispatch(&mut s, &["greg", "-h"]), -1);
    }

    #[test]
    fn test_clg_hardware_restores_registers() {
        let mut s = session();
        s.mem.write_u32(LCD_REG_BASE + GpuReg::WorkAddr.offset(), 0x1000);
        s.mem.write_u32(LCD_REG_BASE + GpuReg::Color.offset(), 0x123456);
        assert_eq!(dispatch(&mut s, &["clg", "-1", "red"]), 0);
        // The plain register file echoes the command, busy included, so
        // the wait runs to its limit and is reported as such
        assert_eq!(out(&mut s), "clg: cleared screen in 50 counts\r\n");
        assert_eq!(reg(&s, GpuReg::CtrlStat), 0);
        assert_eq!(reg(&s, GpuReg::WorkAddr), 0x1000);
        assert_eq!(reg(&s, GpuReg::Color), 0x123456);
    }

    #[test]
    fn test_clg_software() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["clg", "-s", "blue"]), 0);
        assert_eq!(pixel(&s, 0x1000, 0, 0), 0x001F);
        assert_eq!(pixel(&s, 0x1000, 15, 7), 0x001F);
        assert_eq!(s.mem.read_u16(0x1000 + 16 * 8 * 2), 0);
    }

    #[test]
    fn test_clg_unknown_color_draws_nothing() {
        let mut s = session();
        s.color = Color(0x00FF00);
        assert_eq!(dispatch(&mut s, &["clg", "-s", "mauve"]), -1);
        assert_eq!(out(&mut s), "clg: color mauve not found\r\n");
        assert_eq!(dispatch(&mut s, &["clg", "-1", "mauve"]), -1);
        assert_eq!(out(&mut s), "clg: color mauve not found\r\n");
        assert_eq!(s.mem.touched(), 0);
    }

    #[test]
    fn test_pt_hardware() {
        let mut s = session();
        s.color = Color(0xFF0000);
        assert_eq!(dispatch(&mut s, &["pt", "10", "7"]), 0);
        assert_eq!(out(&mut s), "drawing point (10, 7) with 0x00FF0000\r\n");
        assert_eq!(reg(&s, GpuReg::X0Y0), pack_point(10, 7));
        assert_eq!(reg(&s, GpuReg::Color), 0xFF0000);
        assert_eq!(reg(&s, GpuReg::CtrlStat), 0);
    }

    #[test]
    fn test_pt_software() {
        let mut s = session();
        s.color = Color(0xFFFFFF);
        assert_eq!(dispatch(&mut s, &["pt", "-s", "3", "2"]), 0);
        assert_eq!(pixel(&s, 0x1000, 3, 2), 0xFFFF);
        assert_eq!(reg(&s, GpuReg::X0Y0), 0);
    }

    #[test]
    fn test_pt_range() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["pt", "16", "0"]), -1);
        assert_eq!(out(&mut s), "pt: x out of range\r\n");
        assert_eq!(dispatch(&mut s, &["pt", "0", "-1"]), -1);
        assert_eq!(dispatch(&mut s, &["pt", "-s", "1"]), -1);
        assert_eq!(s.mem.touched(), 0);
    }

    #[test]
    fn test_line() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["line", "0", "0", "3", "3", "lime"]), 0);
        assert_eq!(
            out(&mut s),
            "drawing line from (0, 0) to (3, 3) with 0x0000FF00\r\n"
        );
        for i in 0..4 {
            assert_eq!(pixel(&s, 0x1000, i, i), 0x07E0);
        }
        assert_eq!(pixel(&s, 0x1000, 1, 0), 0);
    }

    #[test]
    fn test_line_errors() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["line", "0", "0", "3"]), -1);
        assert_eq!(dispatch(&mut s, &["line", "0", "0", "3", "8"]), -1);
        assert_eq!(dispatch(&mut s, &["line", "0", "0", "3", "3", "mauve"]), -1);
        let text = out(&mut s);
        assert!(text.contains("line: y1 out of range"));
        assert!(text.ends_with("line: color mauve not found\r\n"));
        assert_eq!(s.mem.touched(), 0);
    }

    #[test]
    fn test_rect() {
        let mut s = session();
        s.color = Color(0x0000FF);
        assert_eq!(dispatch(&mut s, &["rect", "1", "2", "10", "6"]), 0);
        assert_eq!(reg(&s, GpuReg::X0Y0), pack_point(1, 2));
        assert_eq!(reg(&s, GpuReg::X1Y1), pack_point(10, 6));
        assert_eq!(reg(&s, GpuReg::CtrlStat), 0);
        assert_eq!(
            out(&mut s),
            "drawn filled rect from (1, 2) to (10, 6) with #000000FF blue in 50 counts\r\n"
        );
    }

    #[test]
    fn test_circle() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["circle", "5", "4", "1", "red"]), 0);
        for (x, y) in [(4, 4), (6, 4), (5, 3), (5, 5)] {
            assert_eq!(pixel(&s, 0x1000, x, y), 0xF800);
        }
        assert_eq!(pixel(&s, 0x1000, 5, 4), 0);
    }

    #[test]
    fn test_circle_zero_radius() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["circle", "5", "5", "0", "white"]), 0);
        assert_eq!(pixel(&s, 0x1000, 5, 5), 0xFFFF);
        assert_eq!(s.mem.touched(), 2);
    }

    #[test]
    fn test_color_show_and_set() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["color"]), 0);
        assert_eq!(out(&mut s), "#00FFFFFF white\r\n");

        assert_eq!(dispatch(&mut s, &["color", "Teal"]), 0);
        assert_eq!(out(&mut s), "Setting color to 0x00008080\r\n");
        assert_eq!(s.color, Color(0x008080));
        assert_eq!(reg(&s, GpuReg::Color), 0x008080);

        assert_eq!(dispatch(&mut s, &["color", "ff123456"]), 0);
        assert_eq!(dispatch(&mut s, &["color"]), 0);
        assert!(out(&mut s).ends_with("#FF123456 \r\n"));
    }

    #[test]
    fn test_color_list_and_errors() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["color", "-l"]), 0);
        assert_eq!(
            out(&mut s),
            "Available colors:\r\nblack, white, red, lime, blue, yellow, cyan, magenta, \
             silver, gray, maroon, olive, green, purple, teal, navy\r\n"
        );
        assert_eq!(dispatch(&mut s, &["color", "mauve"]), -1);
        assert_eq!(s.color, Color::WHITE);
        assert_eq!(dispatch(&mut s, &["color", "-h"]), -1);
    }

    #[test]
    fn test_tt() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, &["tt", "0", "0", "Hi"]), 0);
        assert_eq!(out(&mut s), "drawing text \"Hi\" at (0, 0)\r\n");
        // 'H' has a full-height left column
        for row in 0..7 {
            assert_eq!(pixel(&s, 0x1000, 0, row), 0xFFFF);
        }
        assert_eq!(dispatch(&mut s, &["tt", "0", "0"]), -1);
        assert_eq!(dispatch(&mut s, &["tt", "0", "9", "x"]), -1);
    }
}
