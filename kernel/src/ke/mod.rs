//! Kernel Executive (ke)
//!
//! The monitor's view of the executive is just the trap frame it is
//! entered with.

pub mod trap;

pub use trap::TrapFrame;
