//! Monitor Configuration
//!
//! Compile-time limits for the command interpreter plus a small runtime
//! configuration block handed to [`Monitor`](crate::kd::Monitor) at
//! construction.

use core::ops::Range;

use log::LevelFilter;

/// Maximum number of argument slots, including the terminating slot
pub const MAX_ARGS: usize = 16;

/// Size of the line buffer (enough for one VGA text line)
pub const CMDBUF_SIZE: usize = 80;

/// Prompt shown before every line read
pub const PROMPT: &str = "joos> ";

/// Default cap on frames printed by a single backtrace
pub const MAX_FRAMES: usize = 64;

/// Most verbose level the serial logger emits
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Monitor runtime configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Prompt written before each line
    pub prompt: &'static str,
    /// Print the welcome banner on entry
    pub banner: bool,
    /// Stop a backtrace after this many frames
    pub max_frames: usize,
    /// Address range a frame pointer must fall in, if known
    pub stack_bounds: Option<Range<usize>>,
}

impl MonitorConfig {
    pub const fn new() -> Self {
        Self {
            prompt: PROMPT,
            banner: true,
            max_frames: MAX_FRAMES,
            stack_bounds: None,
        }
    }

    pub fn with_prompt(mut self, prompt: &'static str) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn with_stack_bounds(mut self, bounds: Range<usize>) -> Self {
        self.stack_bounds = Some(bounds);
        self
    }

    /// Check a frame pointer against the configured stack range
    pub fn frame_in_bounds(&self, fp: usize) -> bool {
        match &self.stack_bounds {
            Some(bounds) => bounds.contains(&fp),
            None => true,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}
