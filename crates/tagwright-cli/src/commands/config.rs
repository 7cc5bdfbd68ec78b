//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::{Path, PathBuf};
use tagwright_extractor::ExtractorConfig;

/// Execute the config command.
///
/// `path` is the `--config` override; without it the default location is used.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Init { compact, force } => {
            let written = init_config(path, compact, force)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote {}", written.display()))
            );
        }
        ConfigAction::Show => {
            println!("{}", render_config(config)?);
        }
    }
    Ok(())
}

/// Write a fresh configuration file, refusing to overwrite unless `force`.
pub fn init_config(path: Option<&Path>, compact: bool, force: bool) -> Result<PathBuf> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => Config::path()?,
    };
    if target.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )));
    }

    let config = Config {
        extractor: if compact {
            ExtractorConfig::compact()
        } else {
            ExtractorConfig::default()
        },
        ..Config::default()
    };
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    Ok(target)
}

/// Render a configuration as TOML, never echoing the API key.
pub fn render_config(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("********".to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
}
