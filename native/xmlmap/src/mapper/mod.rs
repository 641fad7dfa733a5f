//! Element Mapper
//!
//! Turns an element into a `Value`, recursively. Attributes, text and
//! children are gathered separately and combined at the end:
//!
//! - attributes present: `{attributes..., "value": text, children...}`
//! - text only: the coerced scalar
//! - text and children: the children object plus `"value"`
//! - otherwise: the children, or `Null`
//!
//! Children with the same key become lists. A child is placed positionally
//! when its name is the configured list key, or when its parent's name
//! equals the child's name or the child's plural.

pub mod coerce;
pub mod fold;
pub mod text;

use tracing::{debug, trace};

use crate::core::loader::{self, Source};
use crate::dom::{Hit, Node, XmlDocument};
use crate::error::{Error, Result};
use crate::inflector::Pluralizer;
use crate::key::{qualify, KeyNormalizer};
use crate::options::Options;
use crate::value::{Map, Value};

pub use coerce::{coerce, coerce_or};
pub use fold::ChildFold;
pub use text::{element_text, text_fragments};

/// Child elements of the context node
pub const CHILD_ELEMENTS: &str = "./child::*";

/// Attributes of the context node
pub const ATTRIBUTES: &str = "./@*";

/// Key for an element's own text when it sits next to other keys
pub const VALUE_KEY: &str = "value";

/// Attribute whose value `text` keeps the element text uncoerced
const TYPE_ATTRIBUTE: &str = "type";

/// Maps XML documents to `Value`s
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    options: Options,
}

impl Mapper {
    pub fn new(options: Options) -> Self {
        Mapper { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_merge_attributes(&mut self, merge: bool) {
        self.options.merge_attributes = merge;
    }

    pub fn merge_attributes(&self) -> bool {
        self.options.merge_attributes
    }

    pub fn set_attributes_key(&mut self, key: impl Into<String>) {
        self.options.attributes_key = key.into();
    }

    pub fn attributes_key(&self) -> &str {
        &self.options.attributes_key
    }

    pub fn set_list_key(&mut self, key: Option<String>) {
        self.options.list_key = key;
    }

    pub fn list_key(&self) -> Option<&str> {
        self.options.list_key.as_deref()
    }

    pub fn set_key_normalizer(&mut self, normalizer: KeyNormalizer) {
        self.options.key_normalizer = normalizer;
    }

    pub fn set_pluralizer(&mut self, pluralizer: Option<Pluralizer>) {
        self.options.pluralizer = pluralizer;
    }

    pub fn set_max_depth(&mut self, depth: usize) {
        self.options.max_depth = depth;
    }

    /// Load, parse and map a whole document
    pub fn parse(&self, source: Source<'_>) -> Result<Value> {
        let text = loader::read(source)?;
        let doc = XmlDocument::parse(&text, &self.options.loader)?;
        self.parse_dom(&doc)
    }

    /// Map a parsed document to `{root_key: value}`
    pub fn parse_dom(&self, doc: &XmlDocument<'_>) -> Result<Value> {
        let root = doc.root_element().ok_or(Error::MissingRootElement)?;
        let key = self.element_key(root);
        let value = self.map_at_depth(root, 1)?;
        debug!(root = %key, "mapped document");

        let mut object = Map::with_capacity(1);
        object.insert(key, value);
        Ok(Value::Object(object))
    }

    /// Map one element, without a wrapping key
    pub fn map_element(&self, node: Node<'_, '_>) -> Result<Value> {
        self.map_at_depth(node, 1)
    }

    fn map_at_depth(&self, node: Node<'_, '_>, depth: usize) -> Result<Value> {
        if depth > self.options.max_depth {
            debug!(limit = self.options.max_depth, element = %node.name(), "nesting limit reached");
            return Err(Error::DepthExceeded {
                limit: self.options.max_depth,
            });
        }

        let attributes = self.collect_attributes(node)?;
        let text = self.text_value(node, attributes.as_ref())?;

        let parent_key = self.options.normalize_key(node.local_name());
        let children = node
            .query(CHILD_ELEMENTS)?
            .iter()
            .filter_map(Hit::as_node)
            .try_fold(ChildFold::default(), |fold, child| {
                self.fold_child(fold, &parent_key, child, depth)
            })?;

        Ok(self.combine(attributes, text, children))
    }

    /// Normalized local name, qualified with the element's prefix
    fn element_key(&self, node: Node<'_, '_>) -> String {
        qualify(node.prefix(), &self.options.normalize_key(node.local_name()))
    }

    fn collect_attributes(&self, node: Node<'_, '_>) -> Result<Option<Map>> {
        let hits = node.query(ATTRIBUTES)?;
        if hits.is_empty() {
            return Ok(None);
        }

        let attributes = hits
            .iter()
            .filter_map(Hit::as_attribute)
            .map(|attr| {
                let key = qualify(attr.prefix(), &self.options.normalize_key(attr.local_name()));
                (key, coerce(attr.value()))
            })
            .collect();
        Ok(Some(attributes))
    }

    fn text_value(&self, node: Node<'_, '_>, attributes: Option<&Map>) -> Result<Option<Value>> {
        let text = element_text(node)?;
        if text.is_empty() {
            return Ok(None);
        }

        let keep_raw = attributes
            .and_then(|attrs| attrs.get(TYPE_ATTRIBUTE))
            .and_then(Value::as_str)
            == Some("text");

        Ok(Some(if keep_raw { Value::String(text) } else { coerce(&text) }))
    }

    fn fold_child(
        &self,
        fold: ChildFold,
        parent_key: &str,
        child: Node<'_, '_>,
        depth: usize,
    ) -> Result<ChildFold> {
        let local = self.options.normalize_key(child.local_name());
        let key = qualify(child.prefix(), &local);
        let value = self.map_at_depth(child, depth + 1)?;

        if fold.contains(&key) {
            return Ok(fold.extend_list(key, value));
        }

        if self.is_list_key(&key, &local) || self.is_equal_or_plural(parent_key, &local) {
            trace!(key = %key, parent = %parent_key, "positional child");
            return Ok(fold.append(value));
        }

        if self.repeats_among_siblings(child)? {
            trace!(key = %key, "repeated sibling name, starting a list");
            return Ok(fold.seed_list(key, value));
        }

        Ok(fold.insert(key, value))
    }

    fn is_list_key(&self, key: &str, local: &str) -> bool {
        self.options
            .list_key
            .as_deref()
            .is_some_and(|list_key| list_key == key || list_key == local)
    }

    fn is_equal_or_plural(&self, parent_key: &str, local: &str) -> bool {
        parent_key == local || parent_key == self.options.pluralize(local)
    }

    /// Whether other siblings share this element's name as written
    fn repeats_among_siblings(&self, child: Node<'_, '_>) -> Result<bool> {
        let name = child.name();
        let expr = format!(
            ".|following-sibling::*[name() = '{name}']|preceding-sibling::*[name() = '{name}']"
        );
        Ok(child.query(&expr)?.len() > 1)
    }

    fn combine(&self, attributes: Option<Map>, text: Option<Value>, children: ChildFold) -> Value {
        match (attributes, text) {
            (Some(attributes), text) => {
                let mut object = if self.options.merge_attributes {
                    attributes
                } else {
                    let mut object = Map::new();
                    object.insert(self.options.attributes_key.clone(), Value::Object(attributes));
                    object
                };
                if let Some(text) = text {
                    object.insert(VALUE_KEY.to_string(), text);
                }
                children.merge_into(&mut object);
                Value::Object(object)
            }
            (None, Some(text)) if children.is_empty() => text,
            (None, Some(text)) => {
                let mut object = children.into_map();
                object.insert(VALUE_KEY.to_string(), text);
                Value::Object(object)
            }
            (None, None) => children.into_value(),
        }
    }
}
