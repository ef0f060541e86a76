//! Command Line Tokenizer
//!
//! Splits the line buffer into whitespace-separated arguments without
//! allocating. Separator bytes are overwritten with NUL as they are
//! skipped, so each argument ends up terminated inside the caller's buffer
//! and the returned slices point straight into it.

use crate::config::MAX_ARGS;

use super::KdError;

/// Argument separators
pub const WHITESPACE: &[u8] = b"\t\r\n ";

#[inline]
fn is_whitespace(b: u8) -> bool {
    WHITESPACE.contains(&b)
}

/// Argument vector for one command invocation
///
/// Holds at most `MAX_ARGS - 1` arguments; the slot after the last argument
/// is always empty and marks the end of the vector.
#[derive(Debug)]
pub struct Args<'a> {
    argv: [&'a str; MAX_ARGS],
    argc: usize,
}

impl<'a> Args<'a> {
    pub fn argc(&self) -> usize {
        self.argc
    }

    pub fn is_empty(&self) -> bool {
        self.argc == 0
    }

    /// All arguments, command name first
    pub fn as_slice(&self) -> &[&'a str] {
        &self.argv[..self.argc]
    }

    /// The command name, if the line was not blank
    pub fn command(&self) -> Option<&'a str> {
        self.as_slice().first().copied()
    }
}

/// Tokenize `buf` in place
///
/// Scanning stops at the end of the buffer or at the first NUL byte.
/// Returns [`KdError::TooManyArgs`] instead of truncating when the line has
/// more arguments than fit.
pub fn parse_args<'a>(buf: &'a mut [u8]) -> Result<Args<'a>, KdError> {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let mut spans = [(0usize, 0usize); MAX_ARGS];
    let mut argc = 0;
    let mut pos = 0;

    loop {
        // Gobble whitespace
        while pos < end && is_whitespace(buf[pos]) {
            buf[pos] = 0;
            pos += 1;
        }
        if pos == end {
            break;
        }

        // Save and scan past next arg
        if argc == MAX_ARGS - 1 {
            return Err(KdError::TooManyArgs);
        }
        let start = pos;
        while pos < end && !is_whitespace(buf[pos]) {
            pos += 1;
        }
        spans[argc] = (start, pos);
        argc += 1;
    }

    let buf: &'a [u8] = buf;
    let mut argv = [""; MAX_ARGS];
    for (slot, &(start, stop)) in argv.iter_mut().zip(&spans[..argc]) {
        *slot = core::str::from_utf8(&buf[start..stop]).map_err(|_| KdError::InvalidUtf8)?;
    }

    Ok(Args { argv, argc })
}
