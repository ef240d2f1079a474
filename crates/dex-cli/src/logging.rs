//! Logging initialization and color control.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};

/// Initialize the tracing subscriber from the global flags.
///
/// Logs go to stderr so stdout stays parseable. JSON output lowers the level to
/// errors unless `--verbose` was given, and disables colors.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let mut level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let machine_output = match &cli.command {
        Commands::Browse(args) => args.output.is_json(),
        Commands::Show { output, .. }
        | Commands::Favorites { output }
        | Commands::Prefetch { output } => output.is_json(),
        Commands::Fav { .. } | Commands::Completions { .. } => false,
    };
    if machine_output && !cli.verbose {
        level = Level::ERROR;
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color || machine_output {
        color_control::set_override(false);
    }
    Ok(())
}
