//! Configuration resolution for CLI commands

use crate::cli::Cli;
use anyhow::{Context, Result};
use polydraw_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::PathBuf;

/// Config file picked up from the working directory when `--config` is absent
const LOCAL_CONFIG_FILE: &str = "polydraw.toml";

/// Resolve defaults, file, environment and flags into one configuration
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    let file = cli.config.clone().or_else(|| {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        local.exists().then_some(local)
    });
    if let Some(path) = file {
        tracing::debug!(path = %path.display(), "Loading config file");
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides {
        base_url: cli.base_url.clone(),
        timeout_secs: cli.timeout_secs,
        zoom: cli.zoom,
    });

    config.validate().context("Configuration is invalid")?;
    Ok(config)
}
