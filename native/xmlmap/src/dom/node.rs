//! Node handles
//!
//! A `Node` pairs a tree node with the document that can run queries for it.
//! Handles built with `Node::detached` have no document and cannot query.

use std::fmt;

use super::document::XmlDocument;
use crate::error::{Error, Result};
use crate::key::qualify;

/// A node of a parsed document
#[derive(Clone, Copy)]
pub struct Node<'a, 'input> {
    inner: roxmltree::Node<'a, 'input>,
    owner: Option<&'a XmlDocument<'input>>,
}

impl<'a, 'input> Node<'a, 'input> {
    pub(crate) fn attached(inner: roxmltree::Node<'a, 'input>, owner: &'a XmlDocument<'input>) -> Self {
        Node {
            inner,
            owner: Some(owner),
        }
    }

    /// Wrap a tree node without an owner document
    pub fn detached(inner: roxmltree::Node<'a, 'input>) -> Self {
        Node { inner, owner: None }
    }

    /// The underlying tree node
    #[inline]
    pub fn raw(&self) -> roxmltree::Node<'a, 'input> {
        self.inner
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.inner.is_element()
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.inner.is_text()
    }

    /// Element name without its prefix
    pub fn local_name(&self) -> &'a str {
        self.inner.tag_name().name()
    }

    /// Namespace prefix the element was written with
    pub fn prefix(&self) -> Option<&'a str> {
        let uri = self.inner.tag_name().namespace()?;
        let input = self.inner.document().input_text();
        let written = input
            .get(self.inner.range())
            .and_then(|tag| tag.strip_prefix('<'))
            .map(|tag| {
                let end = tag
                    .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
                    .unwrap_or(tag.len());
                split_qname(&tag[..end])
            })
            .filter(|&(_, local)| local == self.local_name());

        match written {
            Some((prefix, _)) => prefix,
            // Positions that do not point at the start tag
            None => self.inner.lookup_prefix(uri).filter(|p| !p.is_empty()),
        }
    }

    /// Qualified name, `prefix:local` or `local`
    pub fn name(&self) -> String {
        qualify(self.prefix(), self.local_name())
    }

    /// Content of a text node
    pub fn text(&self) -> Option<&'a str> {
        if self.inner.is_text() {
            self.inner.text()
        } else {
            None
        }
    }

    /// Attributes in document order
    pub fn attributes(&self) -> Vec<Attr<'a, 'input>> {
        self.inner
            .attributes()
            .enumerate()
            .map(|(index, inner)| Attr {
                owner: self.inner,
                inner,
                index,
            })
            .collect()
    }

    /// Child nodes of every kind, in document order
    pub fn child_nodes(&self) -> Vec<Node<'a, 'input>> {
        self.inner
            .children()
            .map(|inner| Node {
                inner,
                owner: self.owner,
            })
            .collect()
    }

    /// The document this node belongs to
    pub fn owner_document(&self) -> Result<&'a XmlDocument<'input>> {
        self.owner.ok_or(Error::DetachedNode)
    }

    /// Run a query with this node as context
    pub fn query(&self, expr: &str) -> Result<Vec<Hit<'a, 'input>>> {
        self.owner_document()?.query(expr, Some(*self))
    }

    /// Wrap a related tree node with the same owner
    pub(crate) fn sibling_handle(&self, inner: roxmltree::Node<'a, 'input>) -> Self {
        Node {
            inner,
            owner: self.owner,
        }
    }
}

impl fmt::Debug for Node<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.inner.id())
            .field("name", &self.name())
            .field("attached", &self.owner.is_some())
            .finish()
    }
}

/// An attribute of an element
#[derive(Clone)]
pub struct Attr<'a, 'input> {
    owner: roxmltree::Node<'a, 'input>,
    inner: roxmltree::Attribute<'a, 'input>,
    index: usize,
}

impl<'a, 'input> Attr<'a, 'input> {
    pub fn local_name(&self) -> &'a str {
        self.inner.name()
    }

    pub fn prefix(&self) -> Option<&'a str> {
        let uri = self.inner.namespace()?;
        let input = self.owner.document().input_text();
        let written = input
            .get(self.inner.range_qname())
            .map(split_qname)
            .filter(|&(_, local)| local == self.local_name());

        match written {
            Some((prefix, _)) => prefix,
            None => self.owner.lookup_prefix(uri).filter(|p| !p.is_empty()),
        }
    }

    pub fn name(&self) -> String {
        qualify(self.prefix(), self.local_name())
    }

    pub fn value(&self) -> &'a str {
        self.inner.value()
    }
}

impl fmt::Debug for Attr<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attr")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}

/// One query result
#[derive(Debug, Clone)]
pub enum Hit<'a, 'input> {
    Node(Node<'a, 'input>),
    Attribute(Attr<'a, 'input>),
}

impl<'a, 'input> Hit<'a, 'input> {
    pub fn as_node(&self) -> Option<Node<'a, 'input>> {
        match self {
            Hit::Node(node) => Some(*node),
            Hit::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&Attr<'a, 'input>> {
        match self {
            Hit::Attribute(attr) => Some(attr),
            Hit::Node(_) => None,
        }
    }

    /// Qualified name, as `name()` sees it
    pub fn name(&self) -> String {
        match self {
            Hit::Node(node) if node.is_element() => node.name(),
            Hit::Node(_) => String::new(),
            Hit::Attribute(attr) => attr.name(),
        }
    }

    /// Document position; attributes sort right after their element
    pub(crate) fn order_key(&self) -> (u32, usize) {
        match self {
            Hit::Node(node) => (node.inner.id().get(), 0),
            Hit::Attribute(attr) => (attr.owner.id().get(), attr.index + 1),
        }
    }
}

/// `prefix:local` or `local`, as written
fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}
