//! Command errors

use core::fmt;

/// Why a command did not run
///
/// Every variant is reported on the console by the dispatcher and yields
/// status -1. Nothing has been written to memory or the GPU when a handler
/// returns one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdError {
    /// Wrong argument count or format; carries the usage text after the
    /// command name
    Usage(&'static str),
    /// Named thing (color, register) not known; `position` is the argument
    /// index holding the name
    Lookup { what: &'static str, position: usize },
    /// Coordinate or index outside its range
    Range(&'static str),
    /// Unparsable data argument, numbered from 1
    BadArgument { position: usize },
    /// Assembled data exceeds the write buffer
    Overflow,
}

pub type CmdResult = Result<(), CmdError>;

impl CmdError {
    /// Exit status reported for this error
    pub const fn status(&self) -> i32 {
        -1
    }
}

impl fmt::Display for CmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmdError::Usage(_) => f.write_str("usage error"),
            CmdError::Lookup { what, .. } => write!(f, "{} not found", what),
            CmdError::Range(what) => write!(f, "{} out of range", what),
            CmdError::BadArgument { position } => write!(f, "data parameter {}", position),
            CmdError::Overflow => f.write_str("write buffer overflow"),
        }
    }
}
