//! Child accumulation
//!
//! Children land either under a name or in the positional run. The fold is
//! rendered once every child has been seen: positional only becomes a list,
//! anything mixed becomes an object with `"0"`, `"1"`, ... keys.

use indexmap::IndexMap;
use tracing::debug;

use crate::value::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Slot {
    Index(usize),
    Key(String),
}

impl Slot {
    fn into_key(self) -> String {
        match self {
            Slot::Index(index) => index.to_string(),
            Slot::Key(key) => key,
        }
    }
}

/// Children of one element, in insertion order
#[derive(Debug, Default)]
pub struct ChildFold {
    entries: IndexMap<Slot, Value>,
    next_index: usize,
}

impl ChildFold {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether a named entry exists
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&Slot::Key(key.to_string()))
    }

    /// Add a positional entry
    pub fn append(mut self, value: Value) -> Self {
        self.entries.insert(Slot::Index(self.next_index), value);
        self.next_index += 1;
        self
    }

    /// Add or replace a named entry
    pub fn insert(mut self, key: String, value: Value) -> Self {
        self.entries.insert(Slot::Key(key), value);
        self
    }

    /// Start a named list with its first value
    pub fn seed_list(self, key: String, value: Value) -> Self {
        self.insert(key, Value::List(vec![value]))
    }

    /// Add to a named list: list values are concatenated, others appended.
    /// A non-list entry is promoted to the list's first item.
    pub fn extend_list(mut self, key: String, value: Value) -> Self {
        match self.entries.get_mut(&Slot::Key(key.clone())) {
            Some(existing) => {
                let items = match std::mem::take(existing) {
                    Value::List(items) => items,
                    other => {
                        debug!(key = %key, "promoting repeated key to a list");
                        vec![other]
                    }
                };
                *existing = Value::List(push_flattened(items, value));
                self
            }
            None => self.insert(key, value),
        }
    }

    /// Render the fold; `Null` when there were no children
    pub fn into_value(self) -> Value {
        if self.entries.is_empty() {
            return Value::Null;
        }

        if self.entries.keys().all(|slot| matches!(slot, Slot::Index(_))) {
            return Value::List(self.entries.into_values().collect());
        }

        Value::Object(self.into_map())
    }

    /// Render as an object, positional entries keyed by their index
    pub fn into_map(self) -> Map {
        self.entries
            .into_iter()
            .map(|(slot, value)| (slot.into_key(), value))
            .collect()
    }

    /// Write every entry into `target`, replacing existing keys in place
    pub fn merge_into(self, target: &mut Map) {
        for (slot, value) in self.entries {
            target.insert(slot.into_key(), value);
        }
    }
}

fn push_flattened(mut items: Vec<Value>, value: Value) -> Vec<Value> {
    match value {
        Value::List(more) => items.extend(more),
        other => items.push(other),
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(fold: ChildFold) -> serde_json::Value {
        serde_json::to_value(fold.into_value()).unwrap()
    }

    #[test]
    fn test_empty_renders_null() {
        let fold = ChildFold::default();
        assert!(fold.is_empty());
        assert_eq!(fold.into_value(), Value::Null);
    }

    #[test]
    fn test_positional_only_renders_list() {
        let fold = ChildFold::default().append("a".into()).append(Value::Null);
        assert_eq!(render(fold), json!(["a", null]));
    }

    #[test]
    fn test_mixed_renders_object_with_index_keys() {
        let fold = ChildFold::default()
            .append("a".into())
            .insert("other".into(), "x".into())
            .append("b".into());
        assert_eq!(render(fold), json!({"0": "a", "other": "x", "1": "b"}));
    }

    #[test]
    fn test_extend_list_concatenates_lists() {
        let fold = ChildFold::default()
            .seed_list("item".into(), Value::Int(1))
            .extend_list("item".into(), Value::List(vec![Value::Int(2), Value::Int(3)]))
            .extend_list("item".into(), Value::Int(4));
        assert_eq!(render(fold), json!({"item": [1, 2, 3, 4]}));
    }

    #[test]
    fn test_extend_list_promotes_scalar() {
        let fold = ChildFold::default()
            .insert("item".into(), "a".into())
            .extend_list("item".into(), "b".into());
        assert_eq!(fold.len(), 1);
        assert_eq!(render(fold), json!({"item": ["a", "b"]}));
    }

    #[test]
    fn test_extend_list_without_entry_inserts() {
        let fold = ChildFold::default().extend_list("item".into(), "a".into());
        assert!(fold.contains("item"));
        assert_eq!(render(fold), json!({"item": "a"}));
    }

    #[test]
    fn test_merge_into_keeps_position_of_existing_keys() {
        let mut target = Map::new();
        target.insert("name".into(), "attr".into());
        target.insert("value".into(), "text".into());

        ChildFold::default()
            .insert("name".into(), "child".into())
            .insert("extra".into(), Value::Int(1))
            .merge_into(&mut target);

        let keys: Vec<&str> = target.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "value", "extra"]);
        assert_eq!(target["name"], Value::from("child"));
    }
}
