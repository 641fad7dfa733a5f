//! Query Adapter
//!
//! A small relative subset of XPath, enough for the mapper:
//! - `./child::*`, `./@*`, `./text()`
//! - unions of `self`, `following-sibling` and `preceding-sibling` steps
//!   filtered by `[name() = '...']`
//!
//! Expressions compile once per document and are cached by `XmlDocument`.

pub mod axes;
pub mod parser;

pub use axes::evaluate;
pub use parser::{compile, Axis, CompiledQuery, NodeTest, Step};
