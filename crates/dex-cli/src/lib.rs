//! dex CLI - browse, filter, and favorite creatures from PokeAPI
//!
//! The binary in `main.rs` only maps errors to exit codes; everything else
//! lives here so integration tests and the binary share one code path.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
pub mod error;
mod logging;
mod output;

use cli::{Cli, Commands};
use commands::Session;
use logging::initialize_logging;

/// Execute the dex CLI with the current arguments and environment.
///
/// # Errors
///
/// Returns an error if configuration, the cache, or the command itself fails.
/// Errors carry a [`error::CliError`] category where one is known.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;
    execute_command(cli).await
}

async fn execute_command(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        commands::generate(shell);
        return Ok(());
    }

    let session = Session::open(cli.config.as_deref())?;
    match cli.command {
        Commands::Browse(args) => commands::browse(&session, args).await,
        Commands::Show { key, output } => commands::show(&session, &key, output).await,
        Commands::Fav { key } => commands::toggle_favorite(&session, &key).await,
        Commands::Favorites { output } => commands::list_favorites(&session, output),
        Commands::Prefetch { output } => commands::prefetch(&session, output).await,
        Commands::Completions { .. } => Ok(()),
    }
}
