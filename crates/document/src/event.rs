use std::rc::Rc;

use serde_json::Value;

use crate::{Document, NodeId};

/// Callback invoked during dispatch. It receives the document so it can
/// mutate the tree or dispatch further events.
pub type Listener = Rc<dyn Fn(&Document, &mut Event)>;

/// Wraps a closure as a [`Listener`].
pub fn listener(callback: impl Fn(&Document, &mut Event) + 'static) -> Listener {
    Rc::new(callback)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: String,
    detail: Value,
    bubbles: bool,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: Value::Null,
            bubbles: true,
            target: None,
            current_target: None,
            propagation_stopped: false,
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = detail;
        self
    }

    pub fn non_bubbling(mut self) -> Self {
        self.bubbles = false;
        self
    }

    /// A fresh, undispatched event with the same kind, detail and bubbling
    /// flag as `self`.
    pub fn equivalent(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            detail: self.detail.clone(),
            bubbles: self.bubbles,
            target: None,
            current_target: None,
            propagation_stopped: false,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn begin_dispatch(&mut self, target: NodeId) {
        self.target = Some(target);
        self.current_target = None;
        self.propagation_stopped = false;
    }

    pub(crate) fn set_current_target(&mut self, node: Option<NodeId>) {
        self.current_target = node;
    }
}
