//! Command implementations

mod config;
mod replay;
mod submit;
mod tile_url;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;
use polydraw_client::HttpSubmitter;
use polydraw_core::config::LayeredConfig;
use polydraw_core::memory::{DryRunSubmitter, RecordingNavigator, RecordingNotifier};
use polydraw_core::ports::PolygonSubmitter;
use polydraw_core::PolygonWidget;
use std::sync::Arc;

/// A simulated page hosting one widget
pub struct Page {
    pub widget: PolygonWidget,
    pub notifier: RecordingNotifier,
    pub navigator: RecordingNavigator,
}

impl Page {
    pub fn open(config: &LayeredConfig) -> Self {
        let widget_config = config.widget_config();
        let notifier = RecordingNotifier::new();
        let navigator = RecordingNavigator::starting_at(widget_config.submit_path.clone());
        let widget = PolygonWidget::new(
            widget_config,
            Arc::new(notifier.clone()),
            Arc::new(navigator.clone()),
        );
        Self { widget, notifier, navigator }
    }
}

fn submitter(config: &LayeredConfig, dry_run: bool) -> Result<Box<dyn PolygonSubmitter>> {
    if dry_run {
        Ok(Box::new(DryRunSubmitter::new()))
    } else {
        Ok(Box::new(HttpSubmitter::from_config(config)?))
    }
}

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = crate::config::load_config(&cli)?;

    match cli.command {
        Commands::Submit(args) => {
            let submitter = submitter(&config, cli.dry_run)?;
            submit::execute(args, &config, submitter.as_ref(), &output, cli.dry_run).await
        }
        Commands::Replay(args) => {
            let submitter = submitter(&config, cli.dry_run)?;
            replay::execute(args, &config, submitter.as_ref(), &output).await
        }
        Commands::TileUrl(args) => tile_url::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}
