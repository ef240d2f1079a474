//! # CLI Structure and Argument Parsing
//!
//! `dex` drives the catalog core from the terminal. Each invocation is one
//! session: it loads as many list pages as asked for, projects them, and prints
//! the result. Favorites and resolved type tags persist in the data directory
//! between runs.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # First page, id order
//! dex browse
//!
//! # Three pages, names containing "saur", sorted by name
//! dex browse --pages 3 -Q saur -s name
//!
//! # Fire types among the first 60 (type tags are prefetched on demand)
//! dex browse --pages 3 -t fire
//!
//! # Details and favorites
//! dex show pikachu
//! dex fav 25
//! dex favorites -o json
//! ```

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use dex_core::{SortMode, TypeFilter};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Main CLI structure for the `dex` command
#[derive(Parser, Clone, Debug)]
#[command(name = "dex")]
#[command(version)]
#[command(about = "dex - browse, filter, and favorite creatures from PokeAPI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "DEX_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Load list pages and print the filtered, sorted view
    Browse(BrowseArgs),

    /// Show details for one creature
    Show {
        /// Numeric id (`25`, `#025`) or name (`pikachu`)
        #[arg(value_name = "ID|NAME")]
        key: String,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Toggle a creature in the favorites list
    Fav {
        /// Numeric id (`25`, `#025`) or name (`pikachu`)
        #[arg(value_name = "ID|NAME")]
        key: String,
    },

    /// List favorites, most recently added first
    Favorites {
        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Resolve and cache type tags for the first window of the catalog
    Prefetch {
        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments of `dex browse`.
#[derive(Args, Clone, Debug)]
pub struct BrowseArgs {
    /// Number of pages to load (20 items each)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Keep loading until the catalog is exhausted
    #[arg(long, conflicts_with = "pages")]
    pub all: bool,

    /// Case-insensitive name filter
    #[arg(short = 'Q', long = "query", value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Type filter: `all`, or a type name. Menu: grass, fire, water, electric, psychic,
    /// ice, dragon, dark, fairy (other types are accepted with a warning)
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "all")]
    pub type_filter: TypeFilter,

    /// Sort order: id or name
    #[arg(short = 's', long, value_name = "ORDER", default_value = "id")]
    pub sort: SortMode,

    /// Resolve type tags for the first window before projecting
    #[arg(long)]
    pub prefetch: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_browse_defaults() {
        let cli = Cli::try_parse_from(["dex", "browse"]).unwrap();
        let Commands::Browse(args) = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(args.pages, 1);
        assert!(!args.all);
        assert_eq!(args.type_filter, TypeFilter::All);
        assert_eq!(args.sort, SortMode::Id);
    }

    #[test]
    fn test_browse_filters() {
        let cli = Cli::try_parse_from([
            "dex", "browse", "--pages", "3", "-Q", "saur", "-t", "Grass", "-s", "name",
        ])
        .unwrap();
        let Commands::Browse(args) = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(args.pages, 3);
        assert_eq!(args.query, "saur");
        assert_eq!(args.type_filter, TypeFilter::Only("grass".into()));
        assert_eq!(args.sort, SortMode::Name);
    }

    #[test]
    fn test_zero_pages_rejected() {
        assert!(Cli::try_parse_from(["dex", "browse", "--pages", "0"]).is_err());
        assert!(Cli::try_parse_from(["dex", "browse", "-s", "height"]).is_err());
    }
}
