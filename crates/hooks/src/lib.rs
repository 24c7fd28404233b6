//! Client-side hooks of the swish component bundle.
//!
//! The host mounts a hook on an element, keeps the returned handle, and calls
//! [`Hook::destroyed`] when the element goes away. Hooks schedule timers on the
//! current `tokio::task::LocalSet`.

use document::{Document, NodeId};
use shared::{domain::HookKind, error::ConfigurationError};
use tracing::debug;

pub mod attribute;
pub mod events;
pub mod portal;
pub mod timer;
pub mod toast;

pub use portal::{PortalConfig, TeleportController};
pub use toast::Toast;

pub trait Hook {
    fn kind(&self) -> HookKind;
    fn destroyed(&mut self);
}

pub fn mount(
    kind: HookKind,
    document: &Document,
    element: NodeId,
) -> Result<Box<dyn Hook>, ConfigurationError> {
    let hook: Box<dyn Hook> = match kind {
        HookKind::Portal => Box::new(TeleportController::mount(document, element)?),
        HookKind::Toast => Box::new(Toast::mount(document, element)?),
    };
    Ok(hook)
}

/// Hooks mounted on a document, keyed by element.
#[derive(Default)]
pub struct HookRegistry {
    mounted: Vec<(NodeId, Box<dyn Hook>)>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts the hook registered under `name` (e.g. `Swish.Portal`). A hook
    /// already mounted on `element` is destroyed once the new one has mounted;
    /// if mounting fails the existing hook stays in place.
    ///
    /// Must be called from within a `tokio::task::LocalSet`: `Swish.Toast`
    /// arms its timer while mounting and panics outside one.
    pub fn mount(
        &mut self,
        name: &str,
        document: &Document,
        element: NodeId,
    ) -> Result<HookKind, ConfigurationError> {
        let kind = name.parse::<HookKind>()?;
        let hook = mount(kind, document, element)?;
        self.destroy(element);
        self.mounted.push((element, hook));
        debug!(hook = kind.host_name(), element = %document.describe(element), "hook mounted");
        Ok(kind)
    }

    /// Returns whether a hook was mounted on `element`.
    pub fn destroy(&mut self, element: NodeId) -> bool {
        let Some(index) = self.mounted.iter().position(|(node, _)| *node == element) else {
            return false;
        };
        let (_, mut hook) = self.mounted.remove(index);
        hook.destroyed();
        true
    }

    pub fn destroy_all(&mut self) {
        for (_, mut hook) in self.mounted.drain(..) {
            hook.destroyed();
        }
    }

    pub fn kind_of(&self, element: NodeId) -> Option<HookKind> {
        self.mounted
            .iter()
            .find(|(node, _)| *node == element)
            .map(|(_, hook)| hook.kind())
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }
}

impl Drop for HookRegistry {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
