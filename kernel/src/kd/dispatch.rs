//! Command Dispatch
//!
//! Tokenizes one input line and runs the matching entry of the command
//! table. Nothing survives between calls: each line gets a fresh argument
//! vector built over its own buffer.

use core::fmt::{self, Write};

use crate::ke::TrapFrame;

use super::args::parse_args;
use super::commands::{print_help, Command, KD_CONTINUE};
use super::KdEnv;

/// First command in `commands` named exactly `name`
pub fn find_command<'c>(commands: &'c [Command], name: &str) -> Option<&'c Command> {
    commands.iter().find(|cmd| cmd.name == name)
}

fn print_unknown(out: &mut dyn Write, name: &str, commands: &[Command]) -> fmt::Result {
    writeln!(out, "Error: unknown command '{}'. ", name)?;
    writeln!(out, "Available commands are:")?;
    print_help(out, commands)
}

/// Run an already tokenized command
///
/// A blank argument vector is a no-op. An unknown command name prints a
/// diagnostic and the command list; it does not end the monitor.
pub fn dispatch(argv: &[&str], tf: Option<&TrapFrame>, env: &mut KdEnv<'_>) -> i32 {
    let Some(&name) = argv.first() else {
        return KD_CONTINUE;
    };

    let commands = env.commands;
    match find_command(commands, name) {
        Some(cmd) => {
            log::debug!("kd: dispatching '{}' ({} args)", cmd.name, argv.len() - 1);
            cmd.handler.invoke(argv, tf, env)
        }
        None => {
            log::debug!("kd: unknown command '{}'", name);
            let _ = print_unknown(env.out, name, commands);
            KD_CONTINUE
        }
    }
}

/// Tokenize and run one line
///
/// Tokenizer errors are reported and the line is dropped with status 0.
pub fn runcmd(buf: &mut [u8], tf: Option<&TrapFrame>, env: &mut KdEnv<'_>) -> i32 {
    let args = match parse_args(buf) {
        Ok(args) => args,
        Err(err) => {
            let _ = writeln!(env.out, "{}", err);
            return KD_CONTINUE;
        }
    };
    dispatch(args.as_slice(), tf, env)
}
