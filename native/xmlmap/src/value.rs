//! Structured Values
//!
//! The output of mapping a document: a tree of maps, lists and scalars.

use indexmap::IndexMap;
use serde::Serialize;

/// Insertion-ordered object
pub type Map = IndexMap<String, Value>;

/// A mapped XML value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Object(Map),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key when this is an object
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_untagged() {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::Int(5));
        map.insert("ratio".to_string(), Value::Float(0.5));
        map.insert("tags".to_string(), Value::List(vec!["a".into(), Value::Null]));
        map.insert("ok".to_string(), Value::Bool(true));

        let json = serde_json::to_value(Value::Object(map)).unwrap();
        assert_eq!(json, json!({"id": 5, "ratio": 0.5, "tags": ["a", null], "ok": true}));
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let mut map = Map::new();
        map.insert("z".to_string(), Value::Null);
        map.insert("a".to_string(), Value::Null);
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn test_accessors() {
        let mut map = Map::new();
        map.insert("name".to_string(), "Bob".into());
        let value = Value::Object(map);

        assert_eq!(value.get("name").and_then(Value::as_str), Some("Bob"));
        assert!(value.get("missing").is_none());
        assert!(Value::default().is_null());
        assert!(Value::List(Vec::new()).is_list());
    }
}
