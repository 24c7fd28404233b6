use std::{fs, path::Path};

use anyhow::Context;
use document::NodeSpec;
use serde::Deserialize;

/// A scripted page plus the host actions to replay against it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub document: NodeSpec,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Mounts a hook by its host name, e.g. `Swish.Portal`.
    Mount { hook: String, selector: String },
    /// Sends `open` or `close` to a portal template.
    Signal { selector: String, signal: String },
    Dispatch {
        selector: String,
        event: String,
        #[serde(default)]
        detail: serde_json::Value,
    },
    /// Records every `event` that reaches `selector`.
    Observe { selector: String, event: String },
    Wait { ms: u64 },
    Snapshot {
        #[serde(default)]
        selector: Option<String>,
    },
    Destroy { selector: String },
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod tests;
