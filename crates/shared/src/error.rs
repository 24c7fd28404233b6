use thiserror::Error;

/// Raised while a hook reads its configuration. A hook that fails with this
/// error has registered nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("missing attribute '{attribute}' on element <{element}>")]
    MissingAttribute { attribute: String, element: String },
    #[error("invalid integer value {value:?} for '{attribute}'")]
    InvalidInteger { attribute: String, value: String },
    #[error("unknown placement mode '{0}'")]
    UnknownPlacement(String),
    #[error("invalid target selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("no element matches target selector '{0}'")]
    TargetNotFound(String),
    #[error("target '{0}' has no parent element to insert a sibling into")]
    DetachedTarget(String),
    #[error("element <{0}> is not a template")]
    NotATemplate(String),
    #[error("unknown hook '{0}'")]
    UnknownHook(String),
    #[error("unknown portal signal '{0}'")]
    UnknownSignal(String),
    #[error("cannot listen for events on <{element}>: {reason}")]
    ListenerRejected { element: String, reason: String },
}
