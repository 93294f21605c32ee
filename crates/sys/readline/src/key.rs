//! Input byte classification
//!
//! The editor only distinguishes a handful of control bytes; everything
//! else is either printable ASCII or dropped.

/// Line feed
pub const LF: u8 = b'\n';
/// Carriage return
pub const CR: u8 = b'\r';
/// Escape, start of an ANSI sequence
pub const ESC: u8 = 0x1B;
/// Backspace (Ctrl-H)
pub const BS: u8 = 0x08;
/// End of text (Ctrl-C)
pub const ETX: u8 = 0x03;

/// Classified input byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// CR or LF
    Enter,
    /// ESC
    Escape,
    /// Backspace
    Backspace,
    /// Printable ASCII (0x20..=0x7E)
    Char(u8),
    /// Anything else
    Other(u8),
}

/// Classify one raw input byte
pub const fn classify(byte: u8) -> Key {
    match byte {
        LF | CR => Key::Enter,
        ESC => Key::Escape,
        BS => Key::Backspace,
        0x20..=0x7E => Key::Char(byte),
        _ => Key::Other(byte),
    }
}

/// Progress through an ANSI escape sequence
///
/// Only two bytes after ESC are absorbed; longer sequences (modified arrow
/// keys, for example) leak their tail into the line as ordinary input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeState {
    #[default]
    Idle,
    /// ESC seen, waiting for the first follow byte
    SawEscape,
    /// First follow byte seen, waiting for the second
    SawEscapeSecondByte,
}

impl EscapeState {
    pub const fn is_pending(self) -> bool {
        !matches!(self, EscapeState::Idle)
    }

    /// State after another ESC byte: a second ESC cancels rather than nests.
    pub const fn toggle(self) -> Self {
        match self {
            EscapeState::Idle => EscapeState::SawEscape,
            _ => EscapeState::Idle,
        }
    }
}
