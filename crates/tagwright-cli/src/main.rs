//! Tagwright CLI - Structured metadata extraction for a paper library.

use clap::Parser;
use tagwright_cli::commands;
use tagwright_cli::{Cli, Command, Config, Formatter};
use tagwright_store::SqliteLibrary;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> tagwright_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config, falling back to defaults when the file is absent
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(color_enabled);

    // Config commands never touch the library
    let command = match cli.command {
        Command::Config(args) => {
            return commands::execute_config(args, &config, cli.config.as_deref(), &formatter);
        }
        other => other,
    };

    let db_path = config.database_path(cli.db.as_deref())?;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    debug!("Opening library {}", db_path.display());
    let library = SqliteLibrary::new(&db_path)?;

    match command {
        Command::Run(args) => {
            commands::execute_run(args, &config, library, &formatter).await?;
        }
        Command::Vocab(args) => {
            commands::execute_vocab(args, &config, &library, &formatter)?;
        }
        Command::Show(args) => {
            commands::execute_show(args, &library, &formatter)?;
        }
        Command::Config(_) => {}
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
