//! Source loading
//!
//! Turns text, bytes or files into a parsed tree:
//! - Encoding detection and conversion to UTF-8
//! - Parser options and tree construction

pub mod encoding;
pub mod loader;

pub use loader::{LoaderOptions, Source};
