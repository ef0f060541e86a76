//! Kernel Debugger Monitor (KD)
//!
//! An interactive command line for inspecting a live kernel without an
//! external debugger attached:
//!
//! - **args**: In-place tokenizer for the input line
//! - **commands**: The compiled-in command table
//! - **dispatch**: Command lookup and invocation
//! - **backtrace**: Frame-pointer stack unwinder
//! - **pgdir**: Page directory walker
//! - **symbols**: Address to source-location lookup
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   line    ┌──────────┐  argv  ┌────────────┐
//! │ Monitor loop │ ────────► │ Tokenizer│ ─────► │ Dispatcher │
//! └──────────────┘           └──────────┘        └─────┬──────┘
//!                                     ┌────────────────┼───────────────┐
//!                                     ▼                ▼               ▼
//!                               ┌──────────┐    ┌────────────┐   ┌──────────┐
//!                               │ btrace   │    │ pgdir      │   │ help ... │
//!                               └──────────┘    └────────────┘   └──────────┘
//! ```
//!
//! Everything the monitor reads from the kernel comes in through a
//! [`KdEnv`]: the console, checked memory access, the symbol table, the
//! page directory and the image layout. The monitor never writes kernel
//! state and assumes nothing else changes it while a command runs.
//!
//! # Targets
//!
//! The page directory view understands the 32-bit two-level format only,
//! while the live stack start and the serial glue ([`kd_monitor`]) exist
//! only on x86_64. A kernel entering through [`kd_monitor`] therefore gets a
//! live `btrace` and a `pgdir` over whatever 32-bit directory it hands in
//! (an empty slice prints just the header). Kernels on other targets drive
//! [`Monitor`] directly and set [`KdEnv::stack_origin`] themselves.

pub mod args;
pub mod backtrace;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod pgdir;
pub mod symbols;

#[cfg(test)]
pub(crate) mod testing;

pub use args::{parse_args, Args};
pub use backtrace::{print_backtrace, Frame, StackStart, StackWalk};
pub use commands::{Builtin, Command, CommandHandler, KernelLayout, COMMANDS, KD_CONTINUE, KD_EXIT};
pub use dispatch::{dispatch, find_command, runcmd};
pub use error::KdError;
pub use symbols::{EipDebugInfo, FuncSym, SymbolResolver, SymbolTable};

use core::fmt::{self, Write};
use core::ops::Range;

use crate::config::MonitorConfig;
use crate::ke::TrapFrame;
use crate::mm::{MemoryReader, Pde};

/// Source of operator input lines
pub trait LineReader {
    /// Block for one line
    ///
    /// `None` means no line is available this time round; the monitor just
    /// prompts again.
    fn read_line(&mut self) -> Option<&mut [u8]>;
}

/// Everything a command can see
pub struct KdEnv<'a> {
    /// Console output
    pub out: &'a mut dyn Write,
    /// Command table used for lookup and `help`
    pub commands: &'a [Command],
    /// Checked reads of kernel memory
    pub memory: &'a dyn MemoryReader,
    pub symbols: &'a dyn SymbolResolver,
    /// Top-level page directory
    pub pgdir: &'a [Pde],
    pub layout: KernelLayout,
    pub config: &'a MonitorConfig,
    /// Fixed starting frame for `btrace`; `None` reads the live registers
    pub stack_origin: Option<StackStart>,
}

/// Monitor loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Waiting for the next line
    Prompting,
    /// A command asked to leave
    Terminated,
}

/// The read-dispatch loop
pub struct Monitor<'a> {
    env: KdEnv<'a>,
    state: MonitorState,
}

impl<'a> Monitor<'a> {
    pub fn new(env: KdEnv<'a>) -> Self {
        Self {
            env,
            state: MonitorState::Prompting,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    fn banner(&mut self, tf: Option<&TrapFrame>) -> fmt::Result {
        let out = &mut *self.env.out;
        writeln!(out, "*********************************************")?;
        writeln!(out, "*    Welcome to the JOOS kernel monitor!    *")?;
        writeln!(out, "*    Type 'help' for a list of commands.    *")?;
        writeln!(out, "*********************************************")?;
        if let Some(tf) = tf {
            writeln!(out, "{}", tf)?;
        }
        Ok(())
    }

    /// One prompt/read/dispatch cycle
    pub fn step(&mut self, reader: &mut dyn LineReader, tf: Option<&TrapFrame>) -> MonitorState {
        if self.state == MonitorState::Terminated {
            return self.state;
        }
        let _ = self.env.out.write_str(self.env.config.prompt);
        if let Some(buf) = reader.read_line() {
            if runcmd(buf, tf, &mut self.env) < 0 {
                log::info!("kd: leaving monitor");
                self.state = MonitorState::Terminated;
            }
        }
        self.state
    }

    /// Prompt and dispatch until a command returns a negative status
    pub fn run(&mut self, reader: &mut dyn LineReader, tf: Option<&TrapFrame>) {
        if self.env.config.banner {
            let _ = self.banner(tf);
        }
        while self.step(reader, tf) == MonitorState::Prompting {}
    }
}

/// What the kernel hands the monitor on entry
pub struct KdServices<'a> {
    /// 32-bit two-level page directory to show; may be empty
    pub pgdir: &'a [Pde],
    pub symbols: &'a dyn SymbolResolver,
    pub layout: KernelLayout,
    /// Address ranges the monitor may read (stacks, image, physical window)
    pub readable: &'a [Range<usize>],
    pub config: MonitorConfig,
}

/// Install the serial logger for the monitor
pub fn kd_init() {
    if crate::rtl::logger::init() {
        log::info!("kd: kernel monitor ready");
    }
}

/// Enter the interactive monitor on the serial console
///
/// Returns when the operator runs `exit`.
#[cfg(target_arch = "x86_64")]
pub fn kd_monitor(tf: Option<&TrapFrame>, services: &KdServices<'_>) {
    use crate::mm::KernelMemory;
    use crate::serial::{SerialConsole, SerialLineReader};

    let memory = KernelMemory::new(services.readable);
    let mut console = SerialConsole;
    let env = KdEnv {
        out: &mut console,
        commands: &COMMANDS,
        memory: &memory,
        symbols: services.symbols,
        pgdir: services.pgdir,
        layout: services.layout,
        config: &services.config,
        stack_origin: None,
    };
    let mut reader = SerialLineReader::new();
    log::info!("kd: entering monitor");
    Monitor::new(env).run(&mut reader, tf);
}
