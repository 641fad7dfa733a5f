//! Mapper configuration

use crate::core::LoaderOptions;
use crate::inflector::Pluralizer;
use crate::key::KeyNormalizer;

/// Default key that holds an element's attributes
pub const DEFAULT_ATTRIBUTES_KEY: &str = "@attributes";

/// Default recursion limit
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Deepest limit the NIFs accept. Dirty CPU schedulers run on a 320 KB
/// stack shared by mapping and term encoding.
pub const SCHEDULER_MAX_DEPTH: usize = 128;

/// Configuration snapshot for one mapper
#[derive(Debug, Clone)]
pub struct Options {
    /// Flatten attributes into the element's object instead of nesting them
    pub merge_attributes: bool,
    /// Key for nested attributes; ignored when merging
    pub attributes_key: String,
    /// Element name that always lands in its parent's list
    pub list_key: Option<String>,
    pub key_normalizer: KeyNormalizer,
    /// `None` limits the list heuristic to equal parent/child names
    pub pluralizer: Option<Pluralizer>,
    /// Deepest element nesting the mapper descends into
    pub max_depth: usize,
    pub loader: LoaderOptions,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            merge_attributes: false,
            attributes_key: DEFAULT_ATTRIBUTES_KEY.to_string(),
            list_key: None,
            key_normalizer: KeyNormalizer::default(),
            pluralizer: None,
            max_depth: DEFAULT_MAX_DEPTH,
            loader: LoaderOptions::default(),
        }
    }
}

impl Options {
    pub fn with_merge_attributes(mut self, merge: bool) -> Self {
        self.merge_attributes = merge;
        self
    }

    pub fn with_attributes_key(mut self, key: impl Into<String>) -> Self {
        self.attributes_key = key.into();
        self
    }

    pub fn with_list_key(mut self, key: impl Into<String>) -> Self {
        self.list_key = Some(key.into());
        self
    }

    pub fn with_key_normalizer(mut self, normalizer: KeyNormalizer) -> Self {
        self.key_normalizer = normalizer;
        self
    }

    pub fn with_pluralizer(mut self, pluralizer: impl Into<Pluralizer>) -> Self {
        self.pluralizer = Some(pluralizer.into());
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_loader(mut self, loader: LoaderOptions) -> Self {
        self.loader = loader;
        self
    }

    #[inline]
    pub(crate) fn normalize_key(&self, name: &str) -> String {
        self.key_normalizer.normalize(name)
    }

    /// The plural of `singular`, or the word itself without a pluralizer
    pub(crate) fn pluralize(&self, singular: &str) -> String {
        match &self.pluralizer {
            Some(pluralizer) => pluralizer.pluralize(singular),
            None => singular.to_string(),
        }
    }
}
