//! x86_64 architecture support
//!
//! - Frame pointer reads for the backtrace command
//! - Port I/O for the COM1 console

pub mod frame;
pub mod io;

pub use frame::{caller_frame, read_rbp};
