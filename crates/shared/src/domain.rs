use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(ControllerId);
id_newtype!(Generation);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Where a teleported clone is inserted relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementMode {
    BeforeTarget,
    AfterTarget,
    #[default]
    InsideTarget,
}

impl PlacementMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeTarget => "before-target",
            Self::AfterTarget => "after-target",
            Self::InsideTarget => "inside-target",
        }
    }

    /// Whether the clone becomes a sibling of the target.
    pub fn needs_target_parent(self) -> bool {
        !matches!(self, Self::InsideTarget)
    }
}

impl FromStr for PlacementMode {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "before-target" | "prepend" => Ok(Self::BeforeTarget),
            "after-target" | "append" => Ok(Self::AfterTarget),
            "inside-target" | "origin" => Ok(Self::InsideTarget),
            other => Err(ConfigurationError::UnknownPlacement(other.to_string())),
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Milliseconds a clone survives after a close signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CloseDelay(pub u64);

impl CloseDelay {
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl fmt::Display for CloseDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Hooks the host can mount, under the names it registers them with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    #[serde(rename = "Swish.Portal")]
    Portal,
    #[serde(rename = "Swish.Toast")]
    Toast,
}

impl HookKind {
    pub const ALL: [HookKind; 2] = [HookKind::Portal, HookKind::Toast];

    pub fn host_name(self) -> &'static str {
        match self {
            Self::Portal => "Swish.Portal",
            Self::Toast => "Swish.Toast",
        }
    }
}

impl FromStr for HookKind {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.host_name() == value)
            .ok_or_else(|| ConfigurationError::UnknownHook(value.to_string()))
    }
}
