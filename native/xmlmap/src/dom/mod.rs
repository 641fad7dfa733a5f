//! DOM Adapter
//!
//! Borrowed handles over a `roxmltree` tree:
//! - `XmlDocument` owns the tree and executes queries against it
//! - `Node` and `Attr` point into the tree and remember their document
//! - `Hit` is one result of a query

pub mod document;
pub mod node;

pub use document::XmlDocument;
pub use node::{Attr, Hit, Node};
