//! Teleport controller behind the `Swish.Portal` hook.
//!
//! On `portal:open` the template content is cloned and placed against the
//! target; interaction events on the clone are forwarded back to the template.
//! On `portal:close` the clone is removed once the close delay has elapsed so
//! exit transitions can play.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    mem,
    rc::{Rc, Weak},
    sync::atomic::{AtomicU64, Ordering},
};

use document::{listener, Document, DomError, ListenerId, NodeId};
use shared::{
    domain::{CloseDelay, ControllerId, Generation, HookKind, PlacementMode},
    error::ConfigurationError,
    protocol::{PortalSignal, CLOSE_DELAY_ATTRIBUTE, TARGET_ATTRIBUTE, UPDATE_ATTRIBUTE},
};
use tracing::{debug, error, info};

use crate::{
    attribute::{optional_attribute, required_attribute, required_integer},
    events::{forward_events, listen_all},
    timer::{self, TimerHandle},
    Hook,
};

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub target_selector: String,
    pub placement: PlacementMode,
    pub close_delay: CloseDelay,
}

impl PortalConfig {
    pub fn from_element(document: &Document, element: NodeId) -> Result<Self, ConfigurationError> {
        let target_selector = required_attribute(document, element, TARGET_ATTRIBUTE)?;
        let placement = optional_attribute(document, element, UPDATE_ATTRIBUTE)
            .map(|raw| raw.parse::<PlacementMode>())
            .transpose()?
            .unwrap_or_default();
        let close_delay = CloseDelay(required_integer(document, element, CLOSE_DELAY_ATTRIBUTE)?);

        Ok(Self {
            target_selector,
            placement,
            close_delay,
        })
    }
}

/// One clone generation: the node and the forwarding listeners on it.
#[derive(Debug)]
struct Teleported {
    generation: Generation,
    node: NodeId,
    listeners: Vec<ListenerId>,
}

struct PendingRemoval {
    clone: Rc<Teleported>,
    timer: TimerHandle,
}

struct PortalState {
    id: ControllerId,
    document: Document,
    template: NodeId,
    target: NodeId,
    placement: PlacementMode,
    close_delay: CloseDelay,
    generation: Generation,
    clone: Option<Rc<Teleported>>,
    pending: BTreeMap<Generation, PendingRemoval>,
    signal_listeners: Vec<ListenerId>,
    torn_down: bool,
}

impl PortalState {
    fn place(&self, node: NodeId) -> Result<(), DomError> {
        match self.placement {
            PlacementMode::BeforeTarget => self.document.insert_before(self.target, node),
            PlacementMode::AfterTarget => self.document.insert_after(self.target, node),
            PlacementMode::InsideTarget => self.document.append_child(self.target, node),
        }
    }

    /// Builds, places and wires a new clone. Nothing stays in the document on
    /// failure.
    fn teleport(&mut self) -> Result<Rc<Teleported>, DomError> {
        let node = self.document.clone_template_content(self.template)?;

        let listeners = self
            .place(node)
            .and_then(|()| forward_events(&self.document, self.template, node));
        let listeners = match listeners {
            Ok(listeners) => listeners,
            Err(err) => {
                self.document.discard(node);
                return Err(err);
            }
        };

        self.generation = self.generation.next();
        Ok(Rc::new(Teleported {
            generation: self.generation,
            node,
            listeners,
        }))
    }

    /// Drops the forwarding listeners, then detaches and frees the clone.
    fn release(&self, clone: &Teleported) {
        for listener in &clone.listeners {
            self.document.remove_event_listener(clone.node, *listener);
        }
        if self.document.discard(clone.node) {
            debug!(
                controller = self.id.0,
                generation = clone.generation.0,
                "portal clone removed"
            );
        }
    }

    fn finish_removal(&mut self, clone: &Teleported) {
        self.pending.remove(&clone.generation);
        if self
            .clone
            .as_ref()
            .is_some_and(|current| current.generation == clone.generation)
        {
            self.clone = None;
        }
        self.release(clone);
    }
}

fn open(state: &RefCell<PortalState>) -> Result<(), DomError> {
    let mut state = state.borrow_mut();
    if state.torn_down {
        debug!(controller = state.id.0, "ignoring open after teardown");
        return Ok(());
    }

    let clone = state.teleport()?;

    // A clone already closing is left to its own timer.
    if let Some(previous) = state.clone.replace(Rc::clone(&clone)) {
        if !state.pending.contains_key(&previous.generation) {
            state.release(&previous);
        }
    }

    info!(
        controller = state.id.0,
        generation = clone.generation.0,
        placement = %state.placement,
        target = %state.document.describe(state.target),
        "portal opened"
    );
    Ok(())
}

fn close(state: &Rc<RefCell<PortalState>>) {
    let weak = Rc::downgrade(state);
    let mut state = state.borrow_mut();
    if state.torn_down {
        debug!(controller = state.id.0, "ignoring close after teardown");
        return;
    }

    let Some(clone) = state.clone.clone() else {
        debug!(controller = state.id.0, "close without an open portal");
        return;
    };

    if state.pending.contains_key(&clone.generation) {
        debug!(
            controller = state.id.0,
            generation = clone.generation.0,
            "portal already closing"
        );
        return;
    }

    let captured = Rc::clone(&clone);
    let timer = timer::schedule(state.close_delay.as_duration(), move || {
        if let Some(state) = weak.upgrade() {
            state.borrow_mut().finish_removal(&captured);
        }
    });

    info!(
        controller = state.id.0,
        generation = clone.generation.0,
        delay = %state.close_delay,
        "portal closing"
    );
    state
        .pending
        .insert(clone.generation, PendingRemoval { clone, timer });
}

fn signal_listener(state: Weak<RefCell<PortalState>>, signal: PortalSignal) -> document::Listener {
    listener(move |_, _| {
        let Some(state) = state.upgrade() else {
            return;
        };
        match signal {
            PortalSignal::Open => {
                if let Err(err) = open(&state) {
                    error!(%err, "failed to open portal");
                }
            }
            PortalSignal::Close => close(&state),
        }
    })
}

/// Owns one template, its target and at most one live clone.
///
/// Must be driven from within a `tokio::task::LocalSet`. Dropping the
/// controller tears it down.
pub struct TeleportController {
    state: Rc<RefCell<PortalState>>,
}

impl TeleportController {
    /// Reads the configuration from the template's attributes.
    pub fn mount(document: &Document, template: NodeId) -> Result<Self, ConfigurationError> {
        let config = PortalConfig::from_element(document, template)?;
        Self::new(document, template, config)
    }

    pub fn new(
        document: &Document,
        template: NodeId,
        config: PortalConfig,
    ) -> Result<Self, ConfigurationError> {
        if document.template_content(template).is_none() {
            return Err(ConfigurationError::NotATemplate(document.describe(template)));
        }

        let target = document
            .query_selector(&config.target_selector)
            .map_err(|err| ConfigurationError::InvalidSelector {
                selector: config.target_selector.clone(),
                reason: err.to_string(),
            })?
            .ok_or_else(|| ConfigurationError::TargetNotFound(config.target_selector.clone()))?;

        // Siblings of a top-level element would land outside every element.
        let has_element_parent = document
            .parent(target)
            .is_some_and(|parent| parent != document.root());
        if config.placement.needs_target_parent() && !has_element_parent {
            return Err(ConfigurationError::DetachedTarget(config.target_selector));
        }

        let state = Rc::new(RefCell::new(PortalState {
            id: ControllerId(NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed)),
            document: document.clone(),
            template,
            target,
            placement: config.placement,
            close_delay: config.close_delay,
            generation: Generation(0),
            clone: None,
            pending: BTreeMap::new(),
            signal_listeners: Vec::new(),
            torn_down: false,
        }));

        let signal_listeners = listen_all(
            document,
            template,
            PortalSignal::ALL
                .map(|signal| (signal.event_kind(), signal_listener(Rc::downgrade(&state), signal))),
        )?;

        {
            let mut guard = state.borrow_mut();
            guard.signal_listeners = signal_listeners;
            info!(
                controller = guard.id.0,
                template = %document.describe(template),
                target = %config.target_selector,
                placement = %config.placement,
                delay = %config.close_delay,
                "portal mounted"
            );
        }

        Ok(Self { state })
    }

    /// Clones the template and places the clone against the target.
    pub fn open(&self) -> Result<(), DomError> {
        open(&self.state)
    }

    /// Schedules removal of the clone that is live right now.
    pub fn close(&self) {
        close(&self.state)
    }

    /// Cancels pending removals, detaches every clone immediately and stops
    /// listening for signals. Safe to call more than once.
    pub fn teardown(&self) {
        let mut state = self.state.borrow_mut();
        if state.torn_down {
            debug!(controller = state.id.0, "portal already torn down");
            return;
        }
        state.torn_down = true;

        for listener in mem::take(&mut state.signal_listeners) {
            state.document.remove_event_listener(state.template, listener);
        }

        for (_, pending) in mem::take(&mut state.pending) {
            pending.timer.cancel();
            state.release(&pending.clone);
        }

        if let Some(clone) = state.clone.take() {
            state.release(&clone);
        }

        info!(controller = state.id.0, "portal torn down");
    }

    pub fn template(&self) -> NodeId {
        self.state.borrow().template
    }

    pub fn target(&self) -> NodeId {
        self.state.borrow().target
    }

    pub fn placement(&self) -> PlacementMode {
        self.state.borrow().placement
    }

    pub fn close_delay(&self) -> CloseDelay {
        self.state.borrow().close_delay
    }

    /// The clone created by the most recent open, if it still exists.
    pub fn current_clone(&self) -> Option<NodeId> {
        self.state.borrow().clone.as_ref().map(|clone| clone.node)
    }

    pub fn pending_removals(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.borrow().torn_down
    }
}

impl Drop for TeleportController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Hook for TeleportController {
    fn kind(&self) -> HookKind {
        HookKind::Portal
    }

    fn destroyed(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/portal_tests.rs"]
mod tests;
