//! Runtime Library (rtl)
//!
//! - **logger**: `log` facade backend writing to the serial port

pub mod logger;
