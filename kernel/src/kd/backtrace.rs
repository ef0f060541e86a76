//! Stack Backtrace
//!
//! Walks the saved frame-pointer chain and prints one line per frame:
//!
//! ```text
//! ===== Stack Backtrace =====
//! kern/init.c:16: test_backtrace(a) <ebp:f010ff38, eip:f0100087>
//! <unknown> <ebp:f010ff58, eip:deadbeef>
//! ===== Backtrace End =====
//! ```
//!
//! Each frame is the pair (frame pointer, word just above it). The next
//! frame pointer is the word the current one points at, and the walk ends
//! when that is zero. All reads go through a [`MemoryReader`], so a corrupt
//! chain ends the walk with a marker line instead of a fault.
//!
//! Precondition: the stack being walked is not changing underneath us.

use core::fmt::{self, Write};
use core::mem::replace;

use crate::config::MonitorConfig;
use crate::mm::{MemoryReader, WORD_SIZE};

use super::symbols::SymbolResolver;
use super::KdError;

/// One activation record in the frame-pointer chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Frame pointer value
    pub fp: usize,
    /// Return address stored one word above `fp`
    pub ret: usize,
}

/// Where a walk begins, supplied by whoever asks for the backtrace
pub type StackStart = Frame;

impl Frame {
    pub const fn new(fp: usize, ret: usize) -> Self {
        Self { fp, ret }
    }

    /// Build a frame from a frame pointer, reading its return address
    pub fn from_fp(mem: &dyn MemoryReader, fp: usize) -> Result<Self, KdError> {
        let ret = mem.read_word(fp.checked_add(WORD_SIZE).ok_or(KdError::BadAddress(fp))?)?;
        Ok(Self { fp, ret })
    }

    /// Address of the `i`th argument slot below the frame pointer (1-based)
    pub fn arg_slot(&self, i: usize) -> Option<usize> {
        self.fp.checked_sub(i * WORD_SIZE)
    }
}

enum Cursor {
    At(Frame),
    Broken(KdError),
    End,
}

/// Iterator over the frames of a stack
///
/// Yields `Ok(frame)` for every frame reached, then at most one `Err`
/// describing why the walk stopped early.
pub struct StackWalk<'m> {
    mem: &'m dyn MemoryReader,
    config: &'m MonitorConfig,
    cursor: Cursor,
    depth: usize,
}

impl<'m> StackWalk<'m> {
    pub fn new(mem: &'m dyn MemoryReader, config: &'m MonitorConfig, start: StackStart) -> Self {
        let cursor = if start.fp == 0 {
            Cursor::End
        } else if !config.frame_in_bounds(start.fp) {
            Cursor::Broken(KdError::BadAddress(start.fp))
        } else {
            Cursor::At(start)
        };
        Self {
            mem,
            config,
            cursor,
            depth: 0,
        }
    }

    /// Follow the saved frame pointer of `frame`
    fn link(&self, frame: Frame) -> Result<Option<Frame>, KdError> {
        let fp = self.mem.read_word(frame.fp)?;
        if fp == 0 {
            return Ok(None);
        }
        if fp <= frame.fp {
            return Err(KdError::FrameLoop(fp));
        }
        if !self.config.frame_in_bounds(fp) {
            return Err(KdError::BadAddress(fp));
        }
        Frame::from_fp(self.mem, fp).map(Some)
    }
}

impl Iterator for StackWalk<'_> {
    type Item = Result<Frame, KdError>;

    fn next(&mut self) -> Option<Self::Item> {
        match replace(&mut self.cursor, Cursor::End) {
            Cursor::End => None,
            Cursor::Broken(err) => Some(Err(err)),
            Cursor::At(frame) => {
                if self.depth >= self.config.max_frames {
                    return Some(Err(KdError::DepthLimit));
                }
                self.depth += 1;
                self.cursor = match self.link(frame) {
                    Ok(Some(next)) => Cursor::At(next),
                    Ok(None) => Cursor::End,
                    Err(err) => Cursor::Broken(err),
                };
                Some(Ok(frame))
            }
        }
    }
}

/// Print one frame line
fn print_frame(
    out: &mut dyn Write,
    mem: &dyn MemoryReader,
    symbols: &dyn SymbolResolver,
    frame: Frame,
) -> fmt::Result {
    match symbols.debuginfo(frame.ret) {
        Some(info) => {
            write!(out, "{}:{}: {}(", info.file, info.line, info.name())?;
            for i in 1..=info.fn_narg {
                if i != 1 {
                    out.write_str(", ")?;
                }
                match frame.arg_slot(i).map(|addr| mem.read_word(addr)) {
                    Some(Ok(value)) => write!(out, "{:x}", value)?,
                    _ => out.write_str("??")?,
                }
            }
            out.write_str(")")?;
        }
        None => out.write_str("<unknown>")?,
    }
    writeln!(out, " <ebp:{:x}, eip:{:x}>", frame.fp, frame.ret)
}

/// Print the call chain starting at `start`
///
/// `start` comes from the caller so that the walk begins outside this
/// function; `None` means no frame pointer was available.
pub fn print_backtrace(
    out: &mut dyn Write,
    mem: &dyn MemoryReader,
    symbols: &dyn SymbolResolver,
    config: &MonitorConfig,
    start: Option<StackStart>,
) -> fmt::Result {
    writeln!(out, "===== Stack Backtrace =====")?;
    match start {
        Some(start) => {
            for item in StackWalk::new(mem, config, start) {
                match item {
                    Ok(frame) => print_frame(out, mem, symbols, frame)?,
                    Err(err) => {
                        log::warn!("backtrace stopped early: {}", err);
                        writeln!(out, "{}", err)?;
                    }
                }
            }
        }
        None => writeln!(out, "<no frame pointer>")?,
    }
    writeln!(out, "===== Backtrace End =====")
}
