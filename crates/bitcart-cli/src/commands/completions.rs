//! Shell completion generation command.

use anyhow::Result;
use bitcart_core::cli::ExitCode;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};
use tracing::debug;

/// Writes the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Prints the completion script for `shell` to stdout.
///
/// # Errors
///
/// Never fails; the `Result` matches the other commands.
#[allow(clippy::unnecessary_wraps)]
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    debug!("Generating {} completions", shell);
    write_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
