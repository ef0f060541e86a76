//! Kernel Logger
//!
//! Backend for the `log` facade. Records go to COM1 as
//! `[LEVEL] target: message` lines, separate from the monitor's own console
//! output.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicBool, Ordering};

use log::{Log, Metadata, Record};

use crate::config::LOG_LEVEL;

/// Format one record the way the serial logger prints it
pub fn write_record(w: &mut dyn Write, record: &Record) -> fmt::Result {
    writeln!(
        w,
        "[{}] {}: {}",
        record.level(),
        record.target(),
        record.args()
    )
}

/// Logger writing to the serial port
pub struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LOG_LEVEL
    }

    #[cfg(target_arch = "x86_64")]
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = write_record(&mut crate::serial::SerialConsole, record);
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn log(&self, _record: &Record) {}

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

static LOGGER_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the serial logger
///
/// Returns false if a logger was already set, ours or someone else's.
pub fn init() -> bool {
    if LOGGER_INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }
    match log::set_logger(&LOGGER) {
        Ok(()) => {
            log::set_max_level(LOG_LEVEL);
            true
        }
        Err(_) => false,
    }
}
