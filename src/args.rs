//! Argument helpers shared by the command handlers

use core::fmt;

/// Index of the exact option `opt` among `args[1..]`
pub fn find_opt(args: &[&str], opt: &str) -> Option<usize> {
    args.iter()
        .enumerate()
        .skip(1)
        .find(|(_, a)| **a == opt)
        .map(|(i, _)| i)
}

/// Split a radix prefix off an unsigned literal: `0x` hex, leading `0`
/// octal, decimal otherwise.
fn radix_of(s: &str) -> (&str, u32) {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    }
}

fn parse_digits(s: &str, radix: u32) -> Option<u32> {
    // from_str_radix would accept a sign
    if s.is_empty() || !s.bytes().all(|b| (b as char).is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(s, radix).ok()
}

/// Parse an unsigned number with C-style radix prefix.
///
/// Unlike `strtoul`, trailing characters and overflow are rejected.
pub fn parse_u32(s: &str) -> Option<u32> {
    let (digits, radix) = radix_of(s);
    parse_digits(digits, radix)
}

/// Signed variant of [`parse_u32`] accepting a leading `-` or `+`
pub fn parse_i32(s: &str) -> Option<i32> {
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = parse_u32(rest)? as i64;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Parse a hex byte literal as typed to `mw`: hex digits with an optional
/// `0x` prefix.
pub fn parse_hex(s: &str) -> Option<u32> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    parse_digits(digits, 16)
}

/// Bits `start..start + len` of a value, most significant first, with a
/// space after every `grouping` bits. Formats as nothing when the range
/// runs past bit 31.
#[derive(Debug, Clone, Copy)]
pub struct Bits {
    value: u32,
    start: u32,
    len: u32,
    grouping: u32,
}

pub fn format_bits(value: u32, start: u32, len: u32, grouping: u32) -> Bits {
    Bits {
        value,
        start,
        len,
        grouping,
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 0 || self.start.checked_add(self.len).map_or(true, |end| end > 32) {
            return Ok(());
        }
        for i in (self.start..self.start + self.len).rev() {
            let bit = if self.value & (1 << i) != 0 { '1' } else { '0' };
            write!(f, "{}", bit)?;
            if self.grouping != 0 && i % self.grouping == 0 && i != self.start {
                f.write_str(" ")?;
            }
        }
        Ok(())
    }
}
