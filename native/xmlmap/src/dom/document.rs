//! XML Document - query executor over a parsed tree
//!
//! Owns the `roxmltree` tree and a small LRU cache of compiled query
//! expressions. The mapper compiles one sibling lookahead per distinct
//! child name, so most documents hit the cache after the first few elements.

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;

use lru::LruCache;

use super::node::{Hit, Node};
use crate::core::LoaderOptions;
use crate::core::loader::parse_tree;
use crate::error::{Error, Result};
use crate::query::{self, CompiledQuery};

/// Compiled expressions kept per document
const QUERY_CACHE_CAPACITY: usize = 64;

/// A parsed document that can answer queries
pub struct XmlDocument<'input> {
    tree: roxmltree::Document<'input>,
    queries: RefCell<LruCache<String, Rc<CompiledQuery>>>,
}

impl<'input> XmlDocument<'input> {
    /// Parse text into a document
    pub fn parse(text: &'input str, options: &LoaderOptions) -> Result<Self> {
        parse_tree(text, options).map(XmlDocument::from)
    }

    /// The underlying tree
    pub fn tree(&self) -> &roxmltree::Document<'input> {
        &self.tree
    }

    /// The document node
    pub fn root(&self) -> Node<'_, 'input> {
        Node::attached(self.tree.root(), self)
    }

    /// The root element, if the document has one
    pub fn root_element(&self) -> Option<Node<'_, 'input>> {
        self.tree
            .root()
            .children()
            .find(|n| n.is_element())
            .map(|n| Node::attached(n, self))
    }

    /// Attach a node of this document's tree
    pub fn node<'a>(&'a self, inner: roxmltree::Node<'a, 'input>) -> Node<'a, 'input> {
        Node::attached(inner, self)
    }

    /// Evaluate `expr` from `context`, or from the document node.
    ///
    /// The context must belong to this document; use `node` to attach a
    /// tree node first.
    pub fn query<'a>(
        &'a self,
        expr: &str,
        context: Option<Node<'a, 'input>>,
    ) -> Result<Vec<Hit<'a, 'input>>> {
        let context = match context {
            Some(node) => {
                if !std::ptr::eq(node.owner_document()?, self) {
                    return Err(Error::ForeignNode);
                }
                node
            }
            None => self.root(),
        };
        let compiled = self.compile(expr)?;
        Ok(query::evaluate(&compiled, context))
    }

    /// Number of compiled expressions currently cached
    pub fn cached_queries(&self) -> usize {
        self.queries.borrow().len()
    }

    fn compile(&self, expr: &str) -> Result<Rc<CompiledQuery>> {
        let cached = self.queries.borrow_mut().get(expr).cloned();
        if let Some(compiled) = cached {
            return Ok(compiled);
        }

        let compiled = Rc::new(query::compile(expr)?);
        self.queries
            .borrow_mut()
            .put(expr.to_string(), Rc::clone(&compiled));
        Ok(compiled)
    }
}

impl<'input> From<roxmltree::Document<'input>> for XmlDocument<'input> {
    fn from(tree: roxmltree::Document<'input>) -> Self {
        let capacity = NonZeroUsize::new(QUERY_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        XmlDocument {
            tree,
            queries: RefCell::new(LruCache::new(capacity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(hits: &[Hit<'_, '_>]) -> Vec<String> {
        hits.iter().map(Hit::name).collect()
    }

    #[test]
    fn test_root_element() {
        let doc = XmlDocument::parse("<?xml version=\"1.0\"?><!--c--><root/>", &LoaderOptions::default()).unwrap();
        assert_eq!(doc.root_element().unwrap().name(), "root");
    }

    #[test]
    fn test_query_from_document_node() {
        let doc = XmlDocument::parse("<root><a/></root>", &LoaderOptions::default()).unwrap();
        let hits = doc.query("./child::*", None).unwrap();
        assert_eq!(names(&hits), ["root"]);
    }

    #[test]
    fn test_query_context_must_belong_to_document() {
        let doc = XmlDocument::parse("<root><a/><b/></root>", &LoaderOptions::default()).unwrap();
        let other = XmlDocument::parse("<other><c/></other>", &LoaderOptions::default()).unwrap();

        let detached = Node::detached(doc.tree().root_element());
        assert!(matches!(doc.query("./child::*", Some(detached)), Err(Error::DetachedNode)));

        let foreign = other.root_element().unwrap();
        assert!(matches!(doc.query("./child::*", Some(foreign)), Err(Error::ForeignNode)));

        let attached = doc.node(doc.tree().root_element());
        let hits = doc.query("./child::*", Some(attached)).unwrap();
        assert_eq!(names(&hits), ["a", "b"]);
        assert!(hits[0].as_node().unwrap().owner_document().is_ok());
    }

    #[test]
    fn test_compiled_queries_are_cached() {
        let doc = XmlDocument::parse("<root><a/></root>", &LoaderOptions::default()).unwrap();
        let root = doc.root_element().unwrap();

        root.query("./child::*").unwrap();
        root.query("./child::*").unwrap();
        root.query("./@*").unwrap();
        assert_eq!(doc.cached_queries(), 2);
    }

    #[test]
    fn test_invalid_query() {
        let doc = XmlDocument::parse("<root/>", &LoaderOptions::default()).unwrap();
        let result = doc.query("//root", None);
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
        assert_eq!(doc.cached_queries(), 0);
    }
}
