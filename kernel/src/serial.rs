//! Serial port console
//!
//! Outputs to COM1 (0x3F8) for the QEMU serial console, and reads operator
//! input for the monitor from the same port.

use core::fmt::{self, Write};
use spin::Mutex;

use crate::arch::io::{inb, outb};
use crate::config::CMDBUF_SIZE;
use crate::kd::LineReader;

/// COM1 port address
const COM1: u16 = 0x3F8;

/// Line status register offset
const LSR: u16 = 5;
/// LSR: received data ready
const LSR_DATA_READY: u8 = 0x01;
/// LSR: transmit holding register empty
const LSR_TX_EMPTY: u8 = 0x20;

/// Serial port writer
pub struct SerialWriter;

impl SerialWriter {
    /// Write a byte to COM1
    fn write_byte(&mut self, byte: u8) {
        unsafe {
            // Wait for transmit buffer to be empty
            while (inb(COM1 + LSR) & LSR_TX_EMPTY) == 0 {}
            outb(COM1, byte);
        }
    }
}

impl Write for SerialWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}

/// Global serial writer (already initialized by the bootloader)
static WRITER: Mutex<SerialWriter> = Mutex::new(SerialWriter);

/// Print to serial port
pub fn _print(args: fmt::Arguments) {
    // The UART write path cannot fail
    let _ = WRITER.lock().write_fmt(args);
}

/// Print macro for serial output
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => ($crate::serial::_print(format_args!($($arg)*)));
}

/// Print with newline macro for serial output
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($($arg:tt)*) => ($crate::serial_print!("{}\n", format_args!($($arg)*)));
}

/// Console handle for the monitor
///
/// Goes through the shared writer lock on every call, so monitor output and
/// log lines never interleave mid-line.
pub struct SerialConsole;

impl Write for SerialConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        WRITER.lock().write_str(s)
    }
}

/// Block until a byte arrives on COM1
fn read_byte() -> u8 {
    unsafe {
        while (inb(COM1 + LSR) & LSR_DATA_READY) == 0 {
            core::hint::spin_loop();
        }
        inb(COM1)
    }
}

/// What one input byte did to the line being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEdit {
    /// Stored; echo it back
    Echo(u8),
    /// Last character removed; erase it on screen
    Erase,
    /// Enter
    Submit,
    /// Ctrl+C
    Cancel,
    /// Nothing changed
    Ignore,
}

/// Apply one input byte to `buf[..*len]`
fn edit_line(buf: &mut [u8], len: &mut usize, byte: u8) -> LineEdit {
    match byte {
        b'\r' | b'\n' => LineEdit::Submit,
        // Backspace / DEL
        0x08 | 0x7F => {
            if *len == 0 {
                return LineEdit::Ignore;
            }
            *len -= 1;
            LineEdit::Erase
        }
        0x03 => LineEdit::Cancel,
        c @ 0x20..=0x7E => {
            if *len >= buf.len() {
                return LineEdit::Ignore;
            }
            buf[*len] = c;
            *len += 1;
            LineEdit::Echo(c)
        }
        _ => LineEdit::Ignore,
    }
}

/// Line editor over COM1
///
/// Echoes printable characters, handles backspace, and hands back the
/// completed line on Enter. Ctrl+C abandons the line and reports no input.
pub struct SerialLineReader {
    buf: [u8; CMDBUF_SIZE],
}

impl SerialLineReader {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; CMDBUF_SIZE],
        }
    }
}

impl LineReader for SerialLineReader {
    fn read_line(&mut self) -> Option<&mut [u8]> {
        let mut len = 0;
        loop {
            match edit_line(&mut self.buf, &mut len, read_byte()) {
                LineEdit::Echo(c) => serial_print!("{}", c as char),
                LineEdit::Erase => serial_print!("\x08 \x08"),
                LineEdit::Submit => {
                    serial_println!();
                    return Some(&mut self.buf[..len]);
                }
                LineEdit::Cancel => {
                    serial_println!("^C");
                    return None;
                }
                LineEdit::Ignore => {}
            }
        }
    }
}
