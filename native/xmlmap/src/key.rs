//! Key Normalization
//!
//! Element and attribute names become object keys through a normalizer.
//! The default lowercases and turns hyphens into underscores.

use std::fmt;
use std::sync::Arc;

type NormalizeFn = dyn Fn(&str) -> String + Send + Sync;

/// Converts XML names into object keys
#[derive(Clone)]
pub struct KeyNormalizer(Arc<NormalizeFn>);

impl KeyNormalizer {
    /// Wrap a custom normalizer
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        KeyNormalizer(Arc::new(f))
    }

    /// Keep names exactly as written
    pub fn identity() -> Self {
        KeyNormalizer::new(str::to_string)
    }

    #[inline]
    pub fn normalize(&self, name: &str) -> String {
        (self.0)(name)
    }
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        KeyNormalizer::new(fix_node_name)
    }
}

impl fmt::Debug for KeyNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyNormalizer(..)")
    }
}

/// Default normalization: lowercase, `-` becomes `_`
pub fn fix_node_name(name: &str) -> String {
    let bytes = name.as_bytes();
    let untouched = memchr::memchr(b'-', bytes).is_none()
        && bytes.iter().all(|b| b.is_ascii() && !b.is_ascii_uppercase());
    if untouched {
        return name.to_string();
    }

    name.to_lowercase().replace('-', "_")
}

/// Join a namespace prefix and a key as `prefix:key`
pub fn qualify(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{key}"),
        _ => key.to_string(),
    }
}
