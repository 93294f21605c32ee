//! Software rasterizer
//!
//! Writes RGB565 pixels directly into a linear framebuffer by address
//! arithmetic. Out-of-range pixels are clipped one by one; nothing here
//! fails.

use picomon_driver_traits::{DriverError, DriverResult, PhysMemory};

use crate::color::Color;
use crate::font::{Font, GLYPH_ROWS};
use crate::{LCD_FB0, LCD_HEIGHT, LCD_PIXEL_BYTES, LCD_WIDTH};

/// How far outside the panel a line is traced exactly, in pixels
pub const LINE_GUARD: i64 = 1 << 16;

/// Largest radius `plot_circle` draws
pub const MAX_RADIUS: i32 = 1 << 20;

/// Upper-bound rule for `plot_point`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsCheck {
    /// Accept `x <= width` and `y <= height`. The extra column lands on the
    /// first pixel of the next row; the extra row lands past the buffer.
    Inclusive,
    /// Accept only `x < width` and `y < height`
    Exclusive,
}

impl Default for BoundsCheck {
    fn default() -> Self {
        if cfg!(feature = "exclusive-bounds") {
            BoundsCheck::Exclusive
        } else {
            BoundsCheck::Inclusive
        }
    }
}

/// Geometry of one framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferConfig {
    pub base: u32,
    pub width: u32,
    pub height: u32,
    pub bounds: BoundsCheck,
}

impl FramebufferConfig {
    /// The LCD panel at `base`
    pub fn lcd(base: u32) -> Self {
        FramebufferConfig {
            base,
            width: LCD_WIDTH,
            height: LCD_HEIGHT,
            bounds: BoundsCheck::default(),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as u32, y as u32);
        match self.bounds {
            BoundsCheck::Inclusive => x <= self.width && y <= self.height,
            BoundsCheck::Exclusive => x < self.width && y < self.height,
        }
    }

    /// Byte address of pixel (x, y)
    pub fn pixel_addr(&self, x: i32, y: i32) -> DriverResult<u32> {
        if !self.contains(x, y) {
            return Err(DriverError::OutOfRange);
        }
        let index = (y as u32) * self.width + x as u32;
        Ok(self.base.wrapping_add(index * LCD_PIXEL_BYTES))
    }

    pub fn size_bytes(&self) -> u32 {
        self.width * self.height * LCD_PIXEL_BYTES
    }
}

impl Default for FramebufferConfig {
    fn default() -> Self {
        Self::lcd(LCD_FB0)
    }
}

/// Plots into framebuffer memory reached through `M`
pub struct Rasterizer<M: PhysMemory> {
    mem: M,
    fb: FramebufferConfig,
}

impl<M: PhysMemory> Rasterizer<M> {
    pub fn new(mem: M, fb: FramebufferConfig) -> Self {
        Rasterizer { mem, fb }
    }

    pub fn config(&self) -> &FramebufferConfig {
        &self.fb
    }

    pub fn memory(&self) -> &M {
        &self.mem
    }

    pub fn into_inner(self) -> M {
        self.mem
    }

    /// Write one pixel; false when clipped.
    pub fn plot_point(&mut self, x: i32, y: i32, color: Color) -> bool {
        match self.fb.pixel_addr(x, y) {
            Ok(addr) => {
                self.mem.write_u16(addr, color.to_rgb565());
                true
            }
            Err(_) => false,
        }
    }

    /// Plot at wide coordinates; anything outside `i32` is clipped.
    fn plot_wide(&mut self, x: i64, y: i64, color: Color) -> bool {
        match (i32::try_from(x), i32::try_from(y)) {
            (Ok(x), Ok(y)) => self.plot_point(x, y, color),
            _ => false,
        }
    }

    /// Cut a segment down to the panel plus [`LINE_GUARD`] on every side.
    ///
    /// Segments already inside come back unchanged; `None` when nothing
    /// of the segment is inside.
    fn clip_segment(&self, p0: (i64, i64), p1: (i64, i64)) -> Option<((i64, i64), (i64, i64))> {
        let (xmin, ymin) = (-LINE_GUARD, -LINE_GUARD);
        let xmax = self.fb.width as i64 + LINE_GUARD;
        let ymax = self.fb.height as i64 + LINE_GUARD;
        let inside = |(x, y): (i64, i64)| (xmin..=xmax).contains(&x) && (ymin..=ymax).contains(&y);
        if inside(p0) && inside(p1) {
            return Some((p0, p1));
        }

        // Liang-Barsky with the parameter kept as a fraction (num, den > 0)
        let (dx, dy) = ((p1.0 - p0.0) as i128, (p1.1 - p0.1) as i128);
        let mut enter = (0i128, 1i128);
        let mut leave = (1i128, 1i128);
        let edges = [
            (-dx, (p0.0 - xmin) as i128),
            (dx, (xmax - p0.0) as i128),
            (-dy, (p0.1 - ymin) as i128),
            (dy, (ymax - p0.1) as i128),
        ];
        for (p, q) in edges {
            if p == 0 {
                if q < 0 {
                    return None;
                }
                continue;
            }
            if p < 0 {
                let t = (-q, -p);
                if t.0 * enter.1 > enter.0 * t.1 {
                    enter = t;
                }
            } else {
                let t = (q, p);
                if t.0 * leave.1 < leave.0 * t.1 {
                    leave = t;
                }
            }
        }
        if enter.0 * leave.1 > leave.0 * enter.1 {
            return None;
        }

        let round = |n: i128, d: i128| (2 * n + d).div_euclid(2 * d) as i64;
        let at = |t: (i128, i128)| (p0.0 + round(dx * t.0, t.1), p0.1 + round(dy * t.0, t.1));
        Some((at(enter), at(leave)))
    }

    /// Bresenham line including both endpoints.
    ///
    /// Returns the number of points visited, clipped or not. Far-off
    /// endpoints are first pulled in to within [`LINE_GUARD`] of the
    /// panel, which keeps the walk short; the traced pixels on the panel
    /// may then differ by one from an unclipped walk.
    pub fn plot_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> u32 {
        let p0 = (x0 as i64, y0 as i64);
        let p1 = (x1 as i64, y1 as i64);
        let Some(((x0, y0), (x1, y1))) = self.clip_segment(p0, p1) else {
            return 0;
        };

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        let mut visited = 0;

        loop {
            self.plot_wide(x, y, color);
            visited += 1;
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        visited
    }

    /// Midpoint circle centered on (xm, ym).
    ///
    /// Each step traces one octant position and reflects it into the four
    /// quadrants. Returns the number of plot calls; a negative radius or
    /// one above [`MAX_RADIUS`] draws nothing and radius zero plots the
    /// center once.
    pub fn plot_circle(&mut self, xm: i32, ym: i32, r: i32, color: Color) -> u32 {
        if !(0..=MAX_RADIUS).contains(&r) {
            return 0;
        }
        if r == 0 {
            self.plot_point(xm, ym, color);
            return 1;
        }

        let (xm, ym, r) = (xm as i64, ym as i64, r as i64);
        let mut x = -r;
        let mut y = 0;
        let mut err = 2 - 2 * r;
        let mut plotted = 0;

        loop {
            self.plot_wide(xm - x, ym + y, color);
            self.plot_wide(xm - y, ym - x, color);
            self.plot_wide(xm + x, ym - y, color);
            self.plot_wide(xm + y, ym + x, color);
            plotted += 4;

            let step = err;
            if step > x {
                x += 1;
                err += x * 2 + 1;
            }
            if step <= y {
                y += 1;
                err += y * 2 + 1;
            }
            if x >= 0 {
                break;
            }
        }
        plotted
    }

    /// Draw `c` with its top-left corner at (x, y); returns the x of the
    /// next character.
    pub fn plot_char(&mut self, x: i32, y: i32, font: Font, c: char, color: Color) -> i32 {
        for (col, &bits) in font.glyph(c).iter().enumerate() {
            for row in 0..GLYPH_ROWS {
                if bits & (1 << row) != 0 {
                    self.plot_wide(x as i64 + col as i64, y as i64 + row as i64, color);
                }
            }
        }
        x.saturating_add(font.advance(c))
    }

    /// Draw a string left to right; returns the x after the last character.
    pub fn draw_text(&mut self, x: i32, y: i32, font: Font, text: &str, color: Color) -> i32 {
        text.chars()
            .fold(x, |x, c| self.plot_char(x, y, font, c, color))
    }

    /// Fill the whole framebuffer, two pixels per word.
    pub fn fill(&mut self, color: Color) {
        let pixel = color.to_rgb565() as u32;
        let word = (pixel << 16) | pixel;
        let words = self.fb.size_bytes() / 4;
        for i in 0..words {
            self.mem.write_u32(self.fb.base.wrapping_add(i * 4), word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picomon_driver_traits::SparseMemory;
    use std::collections::BTreeSet;

    const RED: Color = Color(0xFF0000);

    fn small(bounds: BoundsCheck) -> FramebufferConfig {
        FramebufferConfig {
            base: 0x1000,
            width: 16,
            height: 8,
            bounds,
        }
    }

    fn raster() -> Rasterizer<SparseMemory> {
        Rasterizer::new(SparseMemory::new(), small(BoundsCheck::Exclusive))
    }

    /// Pixels holding a non-zero value, decoded back to coordinates
    fn lit(r: &Rasterizer<SparseMemory>) -> BTreeSet<(i32, i32)> {
        let fb = r.config();
        r.memory()
            .iter()
            .filter(|&(addr, _)| addr % 2 == 0 && r.memory().read_u16(addr) != 0)
            .map(|(addr, _)| {
                let index = (addr - fb.base) / LCD_PIXEL_BYTES;
                ((index % fb.width) as i32, (index / fb.width) as i32)
            })
            .collect()
    }

    #[test]
    fn test_plot_point_writes_rgb565() {
        let mut r = raster();
        assert!(r.plot_point(3, 2, RED));
        let addr = 0x1000 + (2 * 16 + 3) * 2;
        assert_eq!(r.memory().read_u16(addr), 0xF800);
        assert_eq!(r.memory().read_u8(addr), 0x00);
        assert_eq!(r.memory().read_u8(addr + 1), 0xF8);
    }

    #[test]
    fn test_plot_point_clips() {
        let mut r = raster();
        assert!(!r.plot_point(-1, 0, RED));
        assert!(!r.plot_point(0, -1, RED));
        assert!(!r.plot_point(16, 0, RED));
        assert!(!r.plot_point(0, 8, RED));
        assert_eq!(r.memory().touched(), 0);
    }

    #[test]
    fn test_exclusive_boundary() {
        let fb = small(BoundsCheck::Exclusive);
        assert!(fb.contains(15, 7));
        assert!(!fb.contains(16, 7));
        assert!(!fb.contains(15, 8));
    }

    #[test]
    fn test_inclusive_boundary() {
        let fb = small(BoundsCheck::Inclusive);
        assert!(fb.contains(16, 8));
        assert!(!fb.contains(17, 0));
        assert!(!fb.contains(0, 9));
        // x == width wraps onto the next row
        assert_eq!(fb.pixel_addr(16, 0), fb.pixel_addr(0, 1));
    }

    #[test]
    fn test_default_bounds_follow_feature() {
        let expected = if cfg!(feature = "exclusive-bounds") {
            BoundsCheck::Exclusive
        } else {
            BoundsCheck::Inclusive
        };
        assert_eq!(FramebufferConfig::default().bounds, expected);
        assert_eq!(FramebufferConfig::default().base, LCD_FB0);
    }

    #[test]
    fn test_line_diagonal() {
        let mut r = raster();
        assert_eq!(r.plot_line(0, 0, 3, 3, RED), 4);
        let expected: BTreeSet<_> = [(0, 0), (1, 1), (2, 2), (3, 3)].into_iter().collect();
        assert_eq!(lit(&r), expected);
    }

    #[test]
    fn test_line_reversed_and_horizontal() {
        let mut r = raster();
        r.plot_line(5, 1, 2, 1, RED);
        let expected: BTreeSet<_> = (2..=5).map(|x| (x, 1)).collect();
        assert_eq!(lit(&r), expected);
    }

    #[test]
    fn test_line_shallow_slope() {
        let mut r = raster();
        assert_eq!(r.plot_line(0, 0, 6, 2, RED), 7);
        let points = lit(&r);
        assert!(points.contains(&(0, 0)));
        assert!(points.contains(&(6, 2)));
        // One point per column
        let columns: BTreeSet<_> = points.iter().map(|p| p.0).collect();
        assert_eq!(columns.len(), 7);
    }

    #[test]
    fn test_line_single_point() {
        let mut r = raster();
        assert_eq!(r.plot_line(4, 4, 4, 4, RED), 1);
        assert_eq!(lit(&r).len(), 1);
    }

    #[test]
    fn test_line_clipped_still_terminates() {
        let mut r = raster();
        assert_eq!(r.plot_line(-5, 0, 20, 0, RED), 26);
        assert_eq!(lit(&r).len(), 16);
    }

    #[test]
    fn test_circle_radius_zero() {
        let mut r = raster();
        assert_eq!(r.plot_circle(5, 5, 0, RED), 1);
        let expected: BTreeSet<_> = [(5, 5)].into_iter().collect();
        assert_eq!(lit(&r), expected);
    }

    #[test]
    fn test_circle_negative_radius() {
        let mut r = raster();
        assert_eq!(r.plot_circle(5, 5, -2, RED), 0);
        assert_eq!(r.memory().touched(), 0);
    }

    #[test]
    fn test_circle_radius_one() {
        let mut r = raster();
        r.plot_circle(5, 4, 1, RED);
        let expected: BTreeSet<_> = [(4, 4), (6, 4), (5, 3), (5, 5)].into_iter().collect();
        assert_eq!(lit(&r), expected);
    }

    #[test]
    fn test_circle_symmetric() {
        let fb = FramebufferConfig {
            base: 0,
            width: 32,
            height: 32,
            bounds: BoundsCheck::Exclusive,
        };
        let mut r = Rasterizer::new(SparseMemory::new(), fb);
        r.plot_circle(16, 16, 5, RED);
        let points = lit(&r);
        assert!(points.contains(&(21, 16)));
        assert!(points.contains(&(11, 16)));
        assert!(points.contains(&(16, 21)));
        assert!(points.contains(&(16, 11)));
        for &(x, y) in &points {
            assert!(points.contains(&(32 - x, y)));
            assert!(points.contains(&(x, 32 - y)));
            let d2 = (x - 16).pow(2) + (y - 16).pow(2);
            assert!((16..=36).contains(&d2), "({}, {}) off circle", x, y);
        }
    }

    #[test]
    fn test_line_extreme_endpoints_clip() {
        let mut r = raster();
        r.plot_line(i32::MIN, 0, 1, 0, RED);
        let expected: BTreeSet<_> = [(0, 0), (1, 0)].into_iter().collect();
        assert_eq!(lit(&r), expected);

        let mut r = raster();
        r.plot_line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, RED);
        let expected: BTreeSet<_> = (0..8).map(|i| (i, i)).collect();
        assert_eq!(lit(&r), expected);

        let mut r = raster();
        assert_eq!(r.plot_line(i32::MAX, 5, i32::MAX - 10, 5, RED), 0);
        assert_eq!(r.plot_line(-3, i32::MIN, -3, i32::MAX, RED), 2 * LINE_GUARD as u32 + 9);
        assert_eq!(r.memory().touched(), 0);
    }

    #[test]
    fn test_circle_extreme_inputs_clip() {
        let mut r = raster();
        assert_eq!(r.plot_circle(0, 0, 1_200_000_000, RED), 0);
        assert_eq!(r.plot_circle(5, 5, i32::MAX, RED), 0);
        assert!(r.plot_circle(i32::MAX, i32::MIN, 3, RED) > 0);
        assert!(r.plot_circle(i32::MIN, i32::MAX, 3, RED) > 0);
        assert_eq!(r.memory().touched(), 0);

        // Center far to the left, rim just reaching the panel
        r.plot_circle(-(MAX_RADIUS - 3), 3, MAX_RADIUS, RED);
        assert!(lit(&r).contains(&(3, 3)));
    }

    #[test]
    fn test_char_at_edge_of_range() {
        let mut r = raster();
        assert_eq!(r.plot_char(i32::MAX - 2, 0, Font::Fixed5x7, 'W', RED), i32::MAX);
        assert_eq!(r.memory().touched(), 0);
    }

    #[test]
    fn test_plot_char_advance() {
        let mut r = raster();
        let next = r.plot_char(0, 0, Font::Fixed5x7, 'I', RED);
        assert_eq!(next, 6);
        // 'I' is a vertical bar in the middle column with serifs
        let points = lit(&r);
        for row in 0..7 {
            assert!(points.contains(&(2, row)));
        }
    }

    #[test]
    fn test_draw_text_chains() {
        let mut r = raster();
        let end = r.draw_text(0, 0, Font::Proportional, "ii", RED);
        assert_eq!(end, 2 * Font::Proportional.advance('i'));
        assert_eq!(r.draw_text(0, 0, Font::Fixed5x7, "", RED), 0);
    }

    #[test]
    fn test_fill() {
        let mut r = raster();
        r.fill(Color(0x0000FF));
        assert_eq!(lit(&r).len(), 16 * 8);
        assert_eq!(r.memory().read_u32(0x1000), 0x001F_001F);
        assert_eq!(r.memory().read_u16(0x1000 + 16 * 8 * 2 - 2), 0x001F);
        assert_eq!(r.memory().read_u16(0x1000 + 16 * 8 * 2), 0);
    }
}
