//! XmlMap - XML documents as nested maps and lists
//!
//! Layers:
//! - `core`: read, decode and parse a source into a tree
//! - `dom` + `query`: document/node handles and the small query language
//!   the mapper is written against
//! - `mapper`: the element-to-value rules
//! - `parallel`: batch mapping on the Rayon pool
//!
//! The NIFs at the bottom expose `parse/2`, `parse_file/2` and
//! `parse_batch/2` to `XmlMap.Native`.

use rustler::{Binary, Env, Term};

pub mod core;
pub mod dom;
pub mod error;
pub mod inflector;
pub mod key;
pub mod mapper;
pub mod options;
pub mod parallel;
pub mod query;
pub mod value;
mod term;

pub use crate::core::{LoaderOptions, Source};
pub use dom::{Node, XmlDocument};
pub use error::{Error, Result};
pub use inflector::{Inflector, Pluralizer};
pub use key::KeyNormalizer;
pub use mapper::Mapper;
pub use options::Options;
pub use value::{Map, Value};

use term::{result_to_term, NifOptions};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Mapping NIFs
// ============================================================================

/// Map an XML binary (UTF-8 or UTF-16)
#[rustler::nif(schedule = "DirtyCpu")]
fn parse<'a>(env: Env<'a>, input: Binary<'a>, opts: NifOptions) -> Term<'a> {
    let mapper = Mapper::new(opts.into());
    result_to_term(env, &mapper.parse(Source::Bytes(input.as_slice())))
}

/// Map an XML file
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_file<'a>(env: Env<'a>, path: String, opts: NifOptions) -> Term<'a> {
    let mapper = Mapper::new(opts.into());
    result_to_term(env, &mapper.parse(Source::File(path.as_ref())))
}

/// Map several binaries in parallel; one result per input, in order
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_batch<'a>(env: Env<'a>, inputs: Vec<Binary<'a>>, opts: NifOptions) -> Term<'a> {
    let mapper = Mapper::new(opts.into());
    let slices: Vec<&[u8]> = inputs.iter().map(|input| input.as_slice()).collect();

    parallel::map_parallel(&mapper, &slices)
        .iter()
        .rev()
        .fold(Term::list_new_empty(env), |list, result| {
            list.list_prepend(result_to_term(env, result))
        })
}

rustler::init!("Elixir.XmlMap.Native");
