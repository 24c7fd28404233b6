use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{runtime, task::LocalSet};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod runner;
mod scenario;
mod settings;

use runner::Runner;
use scenario::Scenario;
use settings::{load_settings, DEFAULT_SETTINGS_FILE};

/// Replays a scripted page against the swish hooks.
#[derive(Parser, Debug)]
struct Cli {
    /// Scenario file (TOML) with a `document` tree and `steps`.
    #[arg(long)]
    scenario: PathBuf,
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
    /// Overrides the configured tracing filter.
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.settings)?;

    let filter = cli.log_filter.as_deref().unwrap_or(&settings.log_filter);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).context("invalid log filter")?)
        .init();

    let scenario = Scenario::load(&cli.scenario)?;
    info!(
        scenario = scenario.name.as_deref().unwrap_or("unnamed"),
        steps = scenario.steps.len(),
        "running scenario"
    );

    let runtime = runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    let local = LocalSet::new();
    let transcript = local.block_on(&runtime, async {
        let mut runner = Runner::new(&scenario, settings.step_pause())?;
        runner.run(&scenario.steps).await
    })?;

    for line in transcript {
        println!("{line}");
    }

    Ok(())
}
