//! JOOS Kernel Monitor
//!
//! The interactive debugging console a JOOS kernel drops into on a
//! breakpoint or unrecoverable trap, or when it has nothing else to do.
//!
//! # Layout
//!
//! - **kd** - Kernel Debugger: tokenizer, command table, dispatcher, monitor loop
//! - **mm** - Memory inspection: page directory entries, checked reads
//! - **ke** - Trap frame handed in by the trap path
//! - **arch** - Frame pointer reads and port I/O
//! - **rtl** - Runtime Library: serial logger for the `log` facade
//! - **serial** - COM1 console and line editor
//!
//! # Entry
//!
//! The kernel calls [`kd::kd_init`] once the serial port is up, then
//! [`kd::kd_monitor`] with a [`kd::KdServices`] describing its page
//! directory, symbol table, image layout and readable memory.
//!
//! Everything except `serial` and `arch` builds on the host, so the
//! monitor's logic is tested with `cargo test` against in-memory doubles.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::new_without_default)]
#![allow(clippy::missing_safety_doc)]

#[cfg(test)]
extern crate alloc;

#[cfg(target_arch = "x86_64")]
#[macro_use]
pub mod serial;

pub mod arch;
pub mod config;
pub mod kd;
pub mod ke;
pub mod mm;
pub mod rtl;
