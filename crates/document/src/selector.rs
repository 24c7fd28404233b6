//! CSS selector matching over the document arena.
//!
//! Parsing comes from the `selectors` crate with `scraper`'s selector
//! implementation, so selector lists, combinators and structural
//! pseudo-classes behave like `querySelector`. Pseudo-classes that depend on
//! user interaction, such as `:hover`, are rejected at parse time.

use std::fmt;

use scraper::{
    error::SelectorErrorKind,
    selector::{Parser, Simple},
};
use selectors::{
    attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint},
    bloom::BloomFilter,
    matching::{
        self, ElementSelectorFlags, MatchingContext, MatchingForInvalidation, MatchingMode,
        NeedsSelectorFlags, QuirksMode, SelectorCaches,
    },
    parser::{ParseRelative, SelectorImpl, SelectorList},
    OpaqueElement,
};
use thiserror::Error;

use crate::{ElementData, NodeId, NodeKind, Tree};

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

type LocalNameOf = <Simple as SelectorImpl>::LocalName;
type IdentifierOf = <Simple as SelectorImpl>::Identifier;
type AttrValueOf = <Simple as SelectorImpl>::AttrValue;
type NamespaceUrlOf = <Simple as SelectorImpl>::NamespaceUrl;
type BorrowedLocalNameOf = <Simple as SelectorImpl>::BorrowedLocalName;
type BorrowedNamespaceUrlOf = <Simple as SelectorImpl>::BorrowedNamespaceUrl;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("invalid selector '{selector}': {reason}")]
    Invalid { selector: String, reason: String },
}

#[derive(Clone)]
pub struct Selector {
    source: String,
    list: SelectorList<Simple>,
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        if source.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&Parser, &mut parser, ParseRelative::No).map_err(|err| {
            SelectorError::Invalid {
                selector: source.to_string(),
                reason: SelectorErrorKind::from(err).to_string(),
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        let Some(element) = ElementRef::new(tree, node) else {
            return false;
        };

        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );

        self.list
            .slice()
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, &element, &mut context))
    }
}

/// An element node seen through the arena, as the selector engine expects.
#[derive(Clone, Copy)]
struct ElementRef<'a> {
    tree: &'a Tree,
    id: NodeId,
    data: &'a ElementData,
}

impl<'a> ElementRef<'a> {
    fn new(tree: &'a Tree, id: NodeId) -> Option<Self> {
        let data = tree.element(id)?;
        Some(Self { tree, id, data })
    }

    fn siblings(&self) -> (&'a [NodeId], usize) {
        let siblings = self
            .tree
            .parent_of(self.id)
            .and_then(|parent| self.tree.nodes.get(parent))
            .map(|parent| parent.children.as_slice())
            .unwrap_or_default();
        let index = siblings
            .iter()
            .position(|sibling| *sibling == self.id)
            .unwrap_or_default();
        (siblings, index)
    }

    fn first_element<'i>(&self, mut candidates: impl Iterator<Item = &'i NodeId>) -> Option<Self> {
        candidates.find_map(|id| Self::new(self.tree, *id))
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("tag", &self.data.tag)
            .finish()
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.data)
    }

    fn parent_element(&self) -> Option<Self> {
        Self::new(self.tree, self.tree.parent_of(self.id)?)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (siblings, index) = self.siblings();
        self.first_element(siblings[..index].iter().rev())
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (siblings, index) = self.siblings();
        self.first_element(siblings.iter().skip(index + 1))
    }

    fn first_element_child(&self) -> Option<Self> {
        let children = &self.tree.nodes.get(self.id)?.children;
        self.first_element(children.iter())
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &BorrowedLocalNameOf) -> bool {
        self.data.tag.eq_ignore_ascii_case(&local_name.0)
    }

    fn has_namespace(&self, namespace: &BorrowedNamespaceUrlOf) -> bool {
        namespace.is_empty() || &**namespace == XHTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.tag == other.data.tag
    }

    fn attr_matches(
        &self,
        namespace: &NamespaceConstraint<&NamespaceUrlOf>,
        local_name: &LocalNameOf,
        operation: &AttrSelectorOperation<&AttrValueOf>,
    ) -> bool {
        if let NamespaceConstraint::Specific(url) = namespace {
            if !url.is_empty() {
                return false;
            }
        }
        self.data
            .attribute(&local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pseudo_class: &<Simple as SelectorImpl>::NonTSPseudoClass,
        _context: &mut MatchingContext<Simple>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pseudo_element: &<Simple as SelectorImpl>::PseudoElement,
        _context: &mut MatchingContext<Simple>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.data.tag.as_str(), "a" | "area" | "link") && self.data.attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.data.tag == "slot"
    }

    fn has_id(&self, id: &IdentifierOf, case_sensitivity: CaseSensitivity) -> bool {
        self.data
            .attribute("id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &IdentifierOf, case_sensitivity: CaseSensitivity) -> bool {
        self.data.attribute("class").is_some_and(|classes| {
            classes
                .split_ascii_whitespace()
                .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn has_custom_state(&self, _name: &IdentifierOf) -> bool {
        false
    }

    fn imported_part(&self, _name: &IdentifierOf) -> Option<IdentifierOf> {
        None
    }

    fn is_part(&self, _name: &IdentifierOf) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        let Some(node) = self.tree.nodes.get(self.id) else {
            return true;
        };
        node.children
            .iter()
            .all(|child| match self.tree.nodes.get(*child).map(|child| &child.kind) {
                Some(NodeKind::Element(_)) => false,
                Some(NodeKind::Text(text)) => text.is_empty(),
                _ => true,
            })
    }

    fn is_root(&self) -> bool {
        self.tree.parent_of(self.id) == Some(self.tree.root)
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}
