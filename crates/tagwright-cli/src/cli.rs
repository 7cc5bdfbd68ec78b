//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tagwright - Consistent structured tags for a paper library.
#[derive(Debug, Parser)]
#[command(name = "tagwright")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Library database path
    #[arg(long, global = true, env = "TAGWRIGHT_DB")]
    pub db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract metadata for documents and write tags back
    Run(RunArgs),

    /// Show the structured tag vocabulary of the library
    Vocab(VocabArgs),

    /// Show a document's tags and annotation block
    Show(ShowArgs),

    /// Write or print the configuration file
    Config(ConfigArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Document keys to process
    #[arg(required_unless_present = "all")]
    pub keys: Vec<String>,

    /// Process every regular document in the library
    #[arg(long, conflicts_with = "keys")]
    pub all: bool,

    /// API key (overrides config and TAGWRIGHT_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model to use (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for the vocab command.
#[derive(Debug, Parser)]
pub struct VocabArgs {
    /// Print the rendered prompt guide instead of a table
    #[arg(long)]
    pub guide: bool,

    /// Only show one field
    #[arg(short, long, conflicts_with = "guide")]
    pub field: Option<String>,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Document key
    pub key: String,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a configuration file with default settings
    Init {
        /// Use the compact preset for small-context models
        #[arg(long)]
        compact: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show,
}
