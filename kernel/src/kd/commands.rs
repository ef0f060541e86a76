//! Monitor Commands
//!
//! The command table is a fixed, ordered list built at compile time. Each
//! entry pairs a name and help line with a [`CommandHandler`]; the built-in
//! handlers are the variants of [`Builtin`].

use core::fmt::{self, Write};

use crate::ke::TrapFrame;

use super::backtrace::print_backtrace;
use super::pgdir::{print_pgdir, print_pgdir_leaves};
use super::KdEnv;

/// Keep prompting
pub const KD_CONTINUE: i32 = 0;

/// Leave the monitor loop
pub const KD_EXIT: i32 = -1;

/// Something a monitor command can do
pub trait CommandHandler: Sync {
    /// Run with the full argument vector (command name first)
    ///
    /// Returns [`KD_CONTINUE`], or a negative value to end the monitor loop.
    fn invoke(&self, argv: &[&str], tf: Option<&TrapFrame>, env: &mut KdEnv<'_>) -> i32;
}

/// One entry in the command table
pub struct Command {
    pub name: &'static str,
    pub desc: &'static str,
    pub handler: &'static dyn CommandHandler,
}

/// Commands compiled into the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Help,
    KernInfo,
    Backtrace,
    PageDirectory,
    Exit,
}

/// The monitor's command table, in listing order
pub static COMMANDS: [Command; 5] = [
    Command {
        name: "help",
        desc: "Display this list of commands",
        handler: &Builtin::Help,
    },
    Command {
        name: "kerninfo",
        desc: "Display information about the kernel",
        handler: &Builtin::KernInfo,
    },
    Command {
        name: "btrace",
        desc: "Display stack backtrace",
        handler: &Builtin::Backtrace,
    },
    Command {
        name: "pgdir",
        desc: "Display page directory (-l: include page tables)",
        handler: &Builtin::PageDirectory,
    },
    Command {
        name: "exit",
        desc: "Leave the monitor",
        handler: &Builtin::Exit,
    },
];

impl CommandHandler for Builtin {
    fn invoke(&self, argv: &[&str], _tf: Option<&TrapFrame>, env: &mut KdEnv<'_>) -> i32 {
        // Console write errors have nowhere to be reported
        let _ = match self {
            Builtin::Help => print_help(env.out, env.commands),
            Builtin::KernInfo => print_kerninfo(env.out, &env.layout),
            Builtin::Backtrace => {
                // Taken here so the walk starts at this handler's frame
                let start = match env.stack_origin {
                    Some(origin) => Some(origin),
                    #[cfg(target_arch = "x86_64")]
                    None => crate::arch::caller_frame(),
                    #[cfg(not(target_arch = "x86_64"))]
                    None => None,
                };
                print_backtrace(env.out, env.memory, env.symbols, env.config, start)
            }
            Builtin::PageDirectory => match argv.get(1..).unwrap_or(&[]) {
                [] => print_pgdir(env.out, env.pgdir),
                ["-l"] => print_pgdir_leaves(env.out, env.pgdir, env.memory),
                _ => writeln!(env.out, "Usage: pgdir [-l]"),
            },
            Builtin::Exit => return KD_EXIT,
        };
        KD_CONTINUE
    }
}

/// List every command in table order
pub fn print_help(out: &mut dyn Write, commands: &[Command]) -> fmt::Result {
    for cmd in commands {
        writeln!(out, "* {} - {}", cmd.name, cmd.desc)?;
    }
    Ok(())
}

/// Link-time addresses of the kernel image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KernelLayout {
    /// Entry point
    pub entry: usize,
    /// End of text
    pub etext: usize,
    /// End of initialized data
    pub edata: usize,
    /// End of the image (after bss)
    pub end: usize,
    /// Virtual base the image is linked at above its load address
    pub kernbase: usize,
}

impl KernelLayout {
    /// Image size in KB, rounded up
    pub fn footprint_kb(&self) -> usize {
        (self.end.saturating_sub(self.entry) + 1023) / 1024
    }
}

/// Print the special kernel symbols and the image footprint
pub fn print_kerninfo(out: &mut dyn Write, layout: &KernelLayout) -> fmt::Result {
    let symbols = [
        ("entry", layout.entry),
        ("etext", layout.etext),
        ("edata", layout.edata),
        ("end", layout.end),
    ];
    writeln!(out, "Special kernel symbols:")?;
    for (name, addr) in symbols {
        writeln!(
            out,
            "  {:<6} {:08x} (virt)  {:08x} (phys)",
            name,
            addr,
            addr.wrapping_sub(layout.kernbase)
        )?;
    }
    writeln!(
        out,
        "Kernel executable memory footprint: {}KB",
        layout.footprint_kb()
    )
}
