use std::{path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat, Source};
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "playground.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub log_filter: String,
    /// Virtual pause inserted after every scenario step.
    pub step_pause_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            step_pause_ms: 0,
        }
    }
}

impl Settings {
    pub fn step_pause(&self) -> Duration {
        Duration::from_millis(self.step_pause_ms)
    }
}

/// Defaults, then the optional settings file, then `SWISH__*` variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let file = File::from(path).format(FileFormat::Toml).required(false);
    build_settings(file)
        .with_context(|| format!("failed to load settings from {}", path.display()))
}

fn build_settings(file: impl Source + Send + Sync + 'static) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let settings = Config::builder()
        .set_default("log_filter", defaults.log_filter)?
        .set_default("step_pause_ms", defaults.step_pause_ms)?
        .add_source(file)
        .add_source(Environment::with_prefix("SWISH").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
