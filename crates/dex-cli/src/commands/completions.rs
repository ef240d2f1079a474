//! `dex completions`

use clap::CommandFactory;
use clap_complete::Shell;
use std::io;

use crate::cli::Cli;

/// Writes the completion script for `shell` to stdout.
pub fn generate(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "dex", &mut io::stdout().lock());
}
