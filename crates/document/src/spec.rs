use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{error::DomError, Document, NodeId};

/// Declarative description of a subtree, used to build documents from
/// scenario files and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
    /// Inert content of a `<template>` element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn text_node(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn content(mut self, node: NodeSpec) -> Self {
        self.content.push(node);
        self
    }
}

impl Document {
    /// Builds a detached subtree from `spec` and returns its root.
    pub fn build(&self, spec: &NodeSpec) -> Result<NodeId, DomError> {
        let node = match (&spec.tag, &spec.text) {
            (Some(tag), _) => self.create_element(tag),
            (None, Some(text)) => return Ok(self.create_text(text)),
            (None, None) => return Err(DomError::InvalidSpec),
        };

        for (name, value) in &spec.attrs {
            self.set_attribute(node, name, value)?;
        }

        for child in &spec.children {
            let child = self.build(child)?;
            self.append_child(node, child)?;
        }

        if !spec.content.is_empty() {
            let fragment = self
                .template_content(node)
                .ok_or_else(|| DomError::NotATemplate(spec.tag.clone().unwrap_or_default()))?;
            for item in &spec.content {
                let item = self.build(item)?;
                self.append_child(fragment, item)?;
            }
        }

        Ok(node)
    }

    /// A new document whose root holds the subtree described by `spec`.
    pub fn from_spec(spec: &NodeSpec) -> Result<Self, DomError> {
        let document = Self::new();
        let node = document.build(spec)?;
        document.append_child(document.root(), node)?;
        Ok(document)
    }
}
