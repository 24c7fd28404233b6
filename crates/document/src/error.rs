use thiserror::Error;

use crate::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node {0:?} does not exist in this document")]
    UnknownNode(NodeId),
    #[error("node {0:?} has no parent")]
    NoParent(NodeId),
    #[error("inserting {child:?} under {parent:?} would make a node its own ancestor")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("node {0:?} cannot hold children")]
    NotAContainer(NodeId),
    #[error("<{0}> is not a template element")]
    NotATemplate(String),
    #[error("template content has no element to clone")]
    EmptyTemplate,
    #[error("node spec needs either a tag or text")]
    InvalidSpec,
}
