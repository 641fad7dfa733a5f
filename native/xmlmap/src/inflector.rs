//! Pluralization
//!
//! The mapper only ever asks one question: is the parent's name the plural
//! of the child's? `Pluralizer` is the injected capability answering it;
//! `Inflector` is a small English rule set that can serve as one.

use std::fmt;
use std::sync::Arc;

type PluralizeFn = dyn Fn(&str) -> String + Send + Sync;

/// Maps a singular word to its plural
#[derive(Clone)]
pub struct Pluralizer(Arc<PluralizeFn>);

impl Pluralizer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Pluralizer(Arc::new(f))
    }

    #[inline]
    pub fn pluralize(&self, singular: &str) -> String {
        (self.0)(singular)
    }
}

impl fmt::Debug for Pluralizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pluralizer(..)")
    }
}

impl From<Inflector> for Pluralizer {
    fn from(inflector: Inflector) -> Self {
        Pluralizer::new(move |word| inflector.pluralize(word))
    }
}

/// Words whose plural follows no suffix rule
const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("man", "men"),
    ("person", "people"),
    ("woman", "women"),
];

/// Suffixes that take `es` in the plural
const SIBILANTS: &[&str] = &["ox", "s", "sh", "ch"];

/// Rule-based English inflector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inflector {
    /// Add or drop a trailing `s` when no rule matches
    trailing_s: bool,
}

impl Inflector {
    pub fn new(trailing_s: bool) -> Self {
        Inflector { trailing_s }
    }

    pub fn pluralize(&self, singular: &str) -> String {
        if let Some((_, plural)) = IRREGULAR.iter().find(|(s, _)| *s == singular) {
            return plural.to_string();
        }

        if let Some(stem) = singular.strip_suffix('y') {
            if ends_with_consonant(stem) {
                return format!("{stem}ies");
            }
        }

        if SIBILANTS.iter().any(|suffix| singular.ends_with(suffix)) {
            return format!("{singular}es");
        }

        if self.trailing_s && !singular.is_empty() {
            format!("{singular}s")
        } else {
            singular.to_string()
        }
    }

    pub fn singularize(&self, plural: &str) -> String {
        if let Some((singular, _)) = IRREGULAR.iter().find(|(_, p)| *p == plural) {
            return singular.to_string();
        }

        if let Some(stem) = plural.strip_suffix("ies") {
            if ends_with_consonant(stem) {
                return format!("{stem}y");
            }
        }

        if let Some(stem) = plural.strip_suffix("es") {
            if takes_es(stem) {
                return stem.to_string();
            }
        }

        if self.trailing_s {
            if let Some(stem) = plural.strip_suffix('s') {
                if !stem.is_empty() && !stem.ends_with('s') {
                    return stem.to_string();
                }
            }
        }

        plural.to_string()
    }
}

impl Default for Inflector {
    fn default() -> Self {
        Inflector::new(true)
    }
}

/// Whether `stem + "es"` is the plural of `stem`. A stem ending in a single
/// `s` only qualifies as `-us` (not `-ous`/`-aus`/`-eus`) or `-ias`; other
/// `-ses` plurals come from `-se` words.
fn takes_es(stem: &str) -> bool {
    const ES_STEMS: &[&str] = &["ss", "sh", "ch", "x"];
    const SE_WORDS: &[&str] = &["ous", "aus", "eus"];

    ES_STEMS.iter().any(|suffix| stem.ends_with(suffix))
        || (stem.ends_with("us") && !SE_WORDS.iter().any(|suffix| stem.ends_with(suffix)))
        || stem.ends_with("ias")
}

fn ends_with_consonant(stem: &str) -> bool {
    stem.chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
}
