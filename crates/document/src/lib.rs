//! In-memory document tree for the swish hooks.
//!
//! `Document` is a cheap-clone handle over a single-threaded arena. Listener
//! callbacks run with no borrow of the arena held, so they are free to mutate
//! the tree or dispatch further events.

use std::{cell::RefCell, fmt, rc::Rc};

use slotmap::{new_key_type, SlotMap};

mod environment;
pub mod error;
mod event;
pub mod selector;
mod spec;

pub use environment::global_properties;
pub use error::DomError;
pub use event::{listener, Event, Listener, ListenerId};
pub use selector::{Selector, SelectorError};
pub use spec::NodeSpec;

new_key_type! {
    pub struct NodeId;
}

const TEMPLATE_TAG: &str = "template";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
    Fragment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    attributes: Vec<(String, String)>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| key != name);
        before != self.attributes.len()
    }
}

struct RegisteredListener {
    id: ListenerId,
    kind: String,
    callback: Listener,
}

struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    template_content: Option<NodeId>,
    listeners: Vec<RegisteredListener>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            template_content: None,
            listeners: Vec::new(),
        }
    }

    fn can_hold_children(&self) -> bool {
        !matches!(self.kind, NodeKind::Text(_))
    }
}

#[derive(Clone, Copy)]
enum Position {
    Before(NodeId),
    After(NodeId),
    Last,
}

pub(crate) struct Tree {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
    next_listener_id: u64,
}

impl Tree {
    fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(NodeKind::Document));
        Self {
            nodes,
            root,
            next_listener_id: 0,
        }
    }

    fn node(&self, id: NodeId) -> Result<&NodeData, DomError> {
        self.nodes.get(id).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        self.nodes.get_mut(id).ok_or(DomError::UnknownNode(id))
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub(crate) fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent_of(current);
        }
        false
    }

    fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent_of(id) else {
            return false;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|child| *child != id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
        true
    }

    fn insert(&mut self, child: NodeId, position: Position) -> Result<(), DomError> {
        self.node(child)?;
        let parent = match position {
            Position::Last => return Err(DomError::NoParent(child)),
            Position::Before(reference) | Position::After(reference) => self
                .node(reference)?
                .parent
                .ok_or(DomError::NoParent(reference))?,
        };
        self.insert_into(parent, child, position)
    }

    fn insert_into(
        &mut self,
        parent: NodeId,
        child: NodeId,
        position: Position,
    ) -> Result<(), DomError> {
        self.node(child)?;
        if !self.node(parent)?.can_hold_children() {
            return Err(DomError::NotAContainer(parent));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let children = &self.node(parent)?.children;
        let index = match position {
            Position::Last => children.len(),
            Position::Before(reference) => children
                .iter()
                .position(|c| *c == reference)
                .ok_or(DomError::NoParent(reference))?,
            Position::After(reference) => {
                children
                    .iter()
                    .position(|c| *c == reference)
                    .ok_or(DomError::NoParent(reference))?
                    + 1
            }
        };

        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId, DomError> {
        let (kind, children, content) = {
            let node = self.node(id)?;
            (node.kind.clone(), node.children.clone(), node.template_content)
        };

        let copy = self.nodes.insert(NodeData::new(kind));

        for child in children {
            let child_copy = self.clone_subtree(child)?;
            self.node_mut(child_copy)?.parent = Some(copy);
            self.node_mut(copy)?.children.push(child_copy);
        }

        if let Some(content) = content {
            let content_copy = self.clone_subtree(content)?;
            self.node_mut(copy)?.template_content = Some(content_copy);
        }

        Ok(copy)
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        for child in node.children {
            self.free_subtree(child);
        }
        if let Some(content) = node.template_content {
            self.free_subtree(content);
        }
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        match &node.kind {
            NodeKind::Document | NodeKind::Fragment => {
                for child in &node.children {
                    self.write_html(*child, out);
                }
            }
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in element.attributes() {
                    out.push_str(&format!(" {name}=\"{}\"", escape_attribute(value)));
                }
                out.push('>');
                if let Some(content) = node.template_content {
                    self.write_html(content, out);
                }
                for child in &node.children {
                    self.write_html(*child, out);
                }
                out.push_str(&format!("</{}>", element.tag));
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<Tree>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree.borrow();
        f.debug_struct("Document")
            .field("nodes", &tree.nodes.len())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(Tree::new())),
        }
    }

    pub fn root(&self) -> NodeId {
        self.tree.borrow().root
    }

    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        let element = tree
            .nodes
            .insert(NodeData::new(NodeKind::Element(ElementData::new(tag))));
        if tag.eq_ignore_ascii_case(TEMPLATE_TAG) {
            let content = tree.nodes.insert(NodeData::new(NodeKind::Fragment));
            if let Some(node) = tree.nodes.get_mut(element) {
                node.template_content = Some(content);
            }
        }
        element
    }

    pub fn create_text(&self, text: &str) -> NodeId {
        self.tree
            .borrow_mut()
            .nodes
            .insert(NodeData::new(NodeKind::Text(text.to_string())))
    }

    pub fn create_fragment(&self) -> NodeId {
        self.tree
            .borrow_mut()
            .nodes
            .insert(NodeData::new(NodeKind::Fragment))
    }

    /// Whether `node` is still allocated in this document, attached or not.
    pub fn contains(&self, node: NodeId) -> bool {
        self.tree.borrow().nodes.contains_key(node)
    }

    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.tree.borrow().nodes.get(node).map(|data| data.kind.clone())
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().element(node).map(|element| element.tag.clone())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .element(node)
            .and_then(|element| element.attribute(name))
            .map(str::to_string)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.tree
            .borrow()
            .element(node)
            .is_some_and(|element| element.attribute(name).is_some())
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        match &mut tree.node_mut(node)?.kind {
            NodeKind::Element(element) => {
                element.set_attribute(name, value);
                Ok(())
            }
            _ => Err(DomError::NotAnElement(node)),
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) -> bool {
        let mut tree = self.tree.borrow_mut();
        match tree.nodes.get_mut(node).map(|data| &mut data.kind) {
            Some(NodeKind::Element(element)) => element.remove_attribute(name),
            _ => false,
        }
    }

    /// Short human-readable label, e.g. `template#modal`.
    pub fn describe(&self, node: NodeId) -> String {
        let tree = self.tree.borrow();
        match tree.element(node) {
            Some(element) => match element.attribute("id") {
                Some(id) => format!("{}#{id}", element.tag),
                None => element.tag.clone(),
            },
            None => format!("{node:?}"),
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.borrow().parent_of(node)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .nodes
            .get(node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    pub fn first_element_child(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        tree.nodes
            .get(node)?
            .children
            .iter()
            .copied()
            .find(|child| tree.element(*child).is_some())
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let siblings = &tree.nodes.get(tree.parent_of(node)?)?.children;
        let index = siblings.iter().position(|c| *c == node)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let siblings = &tree.nodes.get(tree.parent_of(node)?)?.children;
        let index = siblings.iter().position(|c| *c == node)?;
        siblings.get(index + 1).copied()
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let tree = self.tree.borrow();
        tree.nodes.contains_key(node) && tree.is_inclusive_ancestor(tree.root, node)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree
            .borrow_mut()
            .insert_into(parent, child, Position::Last)
    }

    /// Inserts `node` as the previous sibling of `reference`.
    pub fn insert_before(&self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        if reference == node {
            return Ok(());
        }
        self.tree
            .borrow_mut()
            .insert(node, Position::Before(reference))
    }

    /// Inserts `node` as the next sibling of `reference`.
    pub fn insert_after(&self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        if reference == node {
            return Ok(());
        }
        self.tree
            .borrow_mut()
            .insert(node, Position::After(reference))
    }

    /// Detaches `node` from its parent. Returns whether it was attached.
    pub fn remove(&self, node: NodeId) -> bool {
        self.tree.borrow_mut().detach(node)
    }

    /// Detaches `node` and frees it together with its whole subtree.
    /// Returns whether the node still existed.
    pub fn discard(&self, node: NodeId) -> bool {
        let mut tree = self.tree.borrow_mut();
        if !tree.nodes.contains_key(node) {
            return false;
        }
        tree.detach(node);
        tree.free_subtree(node);
        true
    }

    pub fn template_content(&self, template: NodeId) -> Option<NodeId> {
        self.tree
            .borrow()
            .nodes
            .get(template)
            .and_then(|data| data.template_content)
    }

    /// Structurally independent copy of `node` and its descendants. Listeners
    /// are not copied and the copy has no parent.
    pub fn deep_clone(&self, node: NodeId) -> Result<NodeId, DomError> {
        self.tree.borrow_mut().clone_subtree(node)
    }

    /// Clones the content of a `<template>` element and returns its first
    /// element, detached. The rest of the cloned fragment is freed.
    pub fn clone_template_content(&self, template: NodeId) -> Result<NodeId, DomError> {
        let content = match self.template_content(template) {
            Some(content) => content,
            None => {
                let tag = self.tag_name(template).ok_or(DomError::UnknownNode(template))?;
                return Err(DomError::NotATemplate(tag));
            }
        };

        let fragment = self.deep_clone(content)?;
        let Some(element) = self.first_element_child(fragment) else {
            self.discard(fragment);
            return Err(DomError::EmptyTemplate);
        };

        self.remove(element);
        self.discard(fragment);
        Ok(element)
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(&selector, true).into_iter().next())
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(&selector, false))
    }

    fn select(&self, selector: &Selector, first_only: bool) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        let mut found = Vec::new();
        let mut stack = vec![tree.root];

        // Pre-order walk; template content is not part of the tree.
        while let Some(node) = stack.pop() {
            if selector.matches(&tree, node) {
                found.push(node);
                if first_only {
                    break;
                }
            }
            if let Some(data) = tree.nodes.get(node) {
                stack.extend(data.children.iter().rev().copied());
            }
        }

        found
    }

    pub fn add_event_listener(
        &self,
        node: NodeId,
        kind: &str,
        callback: Listener,
    ) -> Result<ListenerId, DomError> {
        let mut tree = self.tree.borrow_mut();
        let id = ListenerId(tree.next_listener_id);
        tree.node_mut(node)?.listeners.push(RegisteredListener {
            id,
            kind: kind.to_string(),
            callback,
        });
        tree.next_listener_id += 1;
        Ok(id)
    }

    /// Returns whether the listener was registered on `node`.
    pub fn remove_event_listener(&self, node: NodeId, listener: ListenerId) -> bool {
        let mut tree = self.tree.borrow_mut();
        let Some(data) = tree.nodes.get_mut(node) else {
            return false;
        };
        let before = data.listeners.len();
        data.listeners.retain(|registered| registered.id != listener);
        before != data.listeners.len()
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.tree
            .borrow()
            .nodes
            .get(node)
            .map(|data| data.listeners.len())
            .unwrap_or_default()
    }

    fn has_listener(&self, node: NodeId, listener: ListenerId) -> bool {
        self.tree
            .borrow()
            .nodes
            .get(node)
            .is_some_and(|data| data.listeners.iter().any(|l| l.id == listener))
    }

    /// Runs the listeners of `target` and then bubbles through its ancestors
    /// until propagation is stopped. Returns the event after dispatch.
    pub fn dispatch_event(&self, target: NodeId, mut event: Event) -> Result<Event, DomError> {
        let path = {
            let tree = self.tree.borrow();
            tree.node(target)?;
            let mut path = vec![target];
            if event.bubbles() {
                let mut cursor = tree.parent_of(target);
                while let Some(node) = cursor {
                    path.push(node);
                    cursor = tree.parent_of(node);
                }
            }
            path
        };

        event.begin_dispatch(target);

        for node in path {
            let listeners: Vec<(ListenerId, Listener)> = {
                let tree = self.tree.borrow();
                let Some(data) = tree.nodes.get(node) else {
                    break;
                };
                data.listeners
                    .iter()
                    .filter(|registered| registered.kind == event.kind())
                    .map(|registered| (registered.id, Rc::clone(&registered.callback)))
                    .collect()
            };

            event.set_current_target(Some(node));
            for (id, callback) in listeners {
                // Listeners removed by an earlier callback in this pass are skipped.
                if self.has_listener(node, id) {
                    callback(self, &mut event);
                }
            }

            if event.is_propagation_stopped() {
                break;
            }
        }

        event.set_current_target(None);
        Ok(event)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.tree.borrow().write_html(node, &mut out);
        out
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
