//! Monitor Error Codes

use core::fmt;

use crate::config::MAX_ARGS;
use crate::mm::BadAddress;

/// Recoverable monitor errors
///
/// None of these are fatal: the current command is abandoned (or the
/// backtrace is cut short) and the monitor goes back to the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdError {
    /// More arguments than the argument vector can hold
    TooManyArgs,
    /// A token was not valid UTF-8
    InvalidUtf8,
    /// A read hit memory that is not known to be readable
    BadAddress(usize),
    /// The saved frame pointer does not move toward the stack top
    FrameLoop(usize),
    /// The walk reached the configured frame limit
    DepthLimit,
}

impl KdError {
    pub fn message(&self) -> &'static str {
        match self {
            KdError::TooManyArgs => "Too many arguments",
            KdError::InvalidUtf8 => "Invalid UTF-8 in command",
            KdError::BadAddress(_) => "bad frame",
            KdError::FrameLoop(_) => "frame chain loops",
            KdError::DepthLimit => "depth limit reached",
        }
    }
}

impl fmt::Display for KdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdError::TooManyArgs => write!(f, "{} (max {})", self.message(), MAX_ARGS),
            KdError::InvalidUtf8 => f.write_str(self.message()),
            KdError::BadAddress(addr) | KdError::FrameLoop(addr) => {
                write!(f, "<{} at {:x}>", self.message(), addr)
            }
            KdError::DepthLimit => write!(f, "<{}>", self.message()),
        }
    }
}

impl From<BadAddress> for KdError {
    fn from(err: BadAddress) -> Self {
        KdError::BadAddress(err.0)
    }
}
