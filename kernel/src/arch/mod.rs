//! Architecture-specific code
//!
//! Register reads and port I/O for x86_64. Nothing in here is reachable on
//! other targets; the monitor then relies on an explicit stack start.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "x86_64")]
pub use self::x86_64::*;
