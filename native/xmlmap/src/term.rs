//! Elixir Term Conversion
//!
//! Values become plain terms: `nil`, booleans, integers, floats, binaries,
//! lists and maps with binary keys. Errors become `{:error, {kind, message}}`.

use rustler::types::atom;
use rustler::{Atom, Decoder, Encoder, Env, NewBinary, NifResult, Term};
use tracing::debug;

use crate::error::{Error, Result};
use crate::inflector::Inflector;
use crate::options::{Options, SCHEDULER_MAX_DEPTH};
use crate::value::Value;

rustler::atoms! {
    ok,
    error,

    // option keys
    merge_attributes,
    attributes_key,
    list_key,
    pluralize,
    max_depth,
}

impl Encoder for Value {
    fn encode<'a>(&self, env: Env<'a>) -> Term<'a> {
        match self {
            Value::Null => atom::nil().encode(env),
            Value::Bool(b) => b.encode(env),
            Value::Int(n) => n.encode(env),
            Value::Float(f) => f.encode(env),
            Value::String(s) => str_to_binary(env, s),
            Value::List(items) => items
                .iter()
                .rev()
                .fold(Term::list_new_empty(env), |list, item| list.list_prepend(item.encode(env))),
            Value::Object(map) => {
                let keys: Vec<Term<'a>> = map.keys().map(|k| str_to_binary(env, k)).collect();
                let values: Vec<Term<'a>> = map.values().map(|v| v.encode(env)).collect();
                Term::map_from_term_arrays(env, &keys, &values).unwrap_or_else(|err| {
                    debug!(?err, entries = keys.len(), "building map entry by entry");
                    keys.iter()
                        .zip(&values)
                        .fold(Term::map_new(env), |map, (&key, &value)| {
                            map.map_put(key, value).unwrap_or(map)
                        })
                })
            }
        }
    }
}

/// Convert a string to a binary term
#[inline]
fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// `{:error, {kind, message}}`, the kind atom named by `Error::kind`
pub fn error_to_term<'a>(env: Env<'a>, err: &Error) -> Term<'a> {
    let kind = Atom::from_str(env, err.kind()).unwrap_or_else(|_| error());
    let message = err.to_string();
    (error(), (kind, str_to_binary(env, &message))).encode(env)
}

/// `{:ok, value}` or `{:error, {kind, message}}`
pub fn result_to_term<'a>(env: Env<'a>, result: &Result<Value>) -> Term<'a> {
    match result {
        Ok(value) => (ok(), value.encode(env)).encode(env),
        Err(err) => error_to_term(env, err),
    }
}

/// Mapper options decoded from an Elixir map; missing keys keep defaults
#[derive(Debug, Clone, Default)]
pub struct NifOptions(pub Options);

impl<'a> Decoder<'a> for NifOptions {
    fn decode(term: Term<'a>) -> NifResult<Self> {
        if !term.is_map() {
            return Err(rustler::Error::BadArg);
        }

        let mut options = Options::default();
        if let Some(merge) = lookup::<bool>(term, merge_attributes())? {
            options.merge_attributes = merge;
        }
        if let Some(key) = lookup::<String>(term, attributes_key())? {
            options.attributes_key = key;
        }
        if let Some(key) = lookup::<Option<String>>(term, list_key())? {
            options.list_key = key;
        }
        if lookup::<bool>(term, pluralize())?.unwrap_or(false) {
            options.pluralizer = Some(Inflector::default().into());
        }
        if let Some(depth) = lookup::<usize>(term, max_depth())? {
            options.max_depth = scheduler_depth(depth);
        }

        Ok(NifOptions(options))
    }
}

impl From<NifOptions> for Options {
    fn from(options: NifOptions) -> Self {
        options.0
    }
}

/// Dirty scheduler stacks are small; deeper limits would overflow them
fn scheduler_depth(requested: usize) -> usize {
    requested.min(SCHEDULER_MAX_DEPTH)
}

fn lookup<'a, T: Decoder<'a>>(map: Term<'a>, key: Atom) -> NifResult<Option<T>> {
    match map.map_get(key) {
        Ok(value) => value.decode().map(Some),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_depth_is_capped() {
        assert_eq!(scheduler_depth(16), 16);
        assert_eq!(scheduler_depth(SCHEDULER_MAX_DEPTH), SCHEDULER_MAX_DEPTH);
        assert_eq!(scheduler_depth(usize::MAX), SCHEDULER_MAX_DEPTH);
    }
}
