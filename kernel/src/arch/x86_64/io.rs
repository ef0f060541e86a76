//! x86_64 Port I/O Operations
//!
//! Byte-wide port access for the serial console.

use x86_64::instructions::port::{PortReadOnly, PortWriteOnly};

/// Read a byte from an I/O port
#[inline]
pub unsafe fn inb(port: u16) -> u8 {
    let mut port = PortReadOnly::new(port);
    port.read()
}

/// Write a byte to an I/O port
#[inline]
pub unsafe fn outb(port: u16, value: u8) {
    let mut port = PortWriteOnly::new(port);
    port.write(value);
}
