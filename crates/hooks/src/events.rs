use std::sync::LazyLock;

use document::{listener, Document, DomError, Listener, ListenerId, NodeId};
use regex::Regex;
use shared::error::ConfigurationError;
use tracing::{debug, warn};

static HANDLER_SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^on([a-z]+)$").expect("handler slot pattern"));

// Derived once from the environment and shared by every controller.
static FORWARDED_EVENTS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let events: Vec<&'static str> = document::global_properties()
        .iter()
        .copied()
        .filter_map(|name| HANDLER_SLOT.captures(name)?.get(1))
        .map(|kind| kind.as_str())
        .collect();
    debug!(count = events.len(), "collected forwardable event kinds");
    events
});

/// Event kinds a teleported clone forwards back to its template.
pub fn forwarded_events() -> &'static [&'static str] {
    &FORWARDED_EVENTS
}

/// Registers one listener per forwardable event kind on `clone`. Each stops
/// propagation at the clone and re-dispatches an equivalent event on `origin`.
pub fn forward_events(
    document: &Document,
    origin: NodeId,
    clone: NodeId,
) -> Result<Vec<ListenerId>, DomError> {
    forwarded_events()
        .iter()
        .map(|kind| {
            document.add_event_listener(
                clone,
                kind,
                listener(move |document, event| {
                    event.stop_propagation();
                    if let Err(err) = document.dispatch_event(origin, event.equivalent()) {
                        warn!(event = event.kind(), %err, "failed to forward event to template");
                    }
                }),
            )
        })
        .collect()
}

/// Registers every `(kind, listener)` pair on `element`, or none of them.
pub(crate) fn listen_all(
    document: &Document,
    element: NodeId,
    registrations: impl IntoIterator<Item = (&'static str, Listener)>,
) -> Result<Vec<ListenerId>, ConfigurationError> {
    let mut registered = Vec::new();
    for (kind, callback) in registrations {
        match document.add_event_listener(element, kind, callback) {
            Ok(id) => registered.push(id),
            Err(err) => {
                for id in registered {
                    document.remove_event_listener(element, id);
                }
                return Err(ConfigurationError::ListenerRejected {
                    element: document.describe(element),
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(registered)
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
