use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Attribute holding the selector of the element a portal is placed against.
pub const TARGET_ATTRIBUTE: &str = "data-target";
/// Attribute holding the placement mode.
pub const UPDATE_ATTRIBUTE: &str = "data-update";
pub const CLOSE_DELAY_ATTRIBUTE: &str = "data-close-delay";

/// Payload-free notifications the host delivers on a portal template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalSignal {
    Open,
    Close,
}

impl PortalSignal {
    pub const ALL: [PortalSignal; 2] = [PortalSignal::Open, PortalSignal::Close];

    /// Event kind the signal is dispatched as.
    pub fn event_kind(self) -> &'static str {
        match self {
            Self::Open => "portal:open",
            Self::Close => "portal:close",
        }
    }
}

impl FromStr for PortalSignal {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" | "portal:open" => Ok(Self::Open),
            "close" | "portal:close" => Ok(Self::Close),
            other => Err(ConfigurationError::UnknownSignal(other.to_string())),
        }
    }
}
