//! Source Loader
//!
//! The caller decides whether input is markup or a path; the loader only
//! reads, decodes and parses.

use std::borrow::Cow;
use std::path::Path;

use roxmltree::{Document, ParsingOptions};
use tracing::trace;

use super::encoding;
use crate::error::Result;

/// Where a document comes from
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// Markup already held as text
    Text(&'a str),
    /// Raw bytes, UTF-8 or UTF-16
    Bytes(&'a [u8]),
    /// A local file
    File(&'a Path),
}

/// Parser settings passed through to the tree builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Accept a DOCTYPE; external entities are never fetched
    pub allow_dtd: bool,
    /// Maximum number of nodes in one tree
    pub nodes_limit: u32,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            allow_dtd: true,
            nodes_limit: u32::MAX,
        }
    }
}

/// Read a source into UTF-8 text
pub fn read(source: Source<'_>) -> Result<Cow<'_, str>> {
    match source {
        Source::Text(text) => Ok(Cow::Borrowed(text.strip_prefix('\u{FEFF}').unwrap_or(text))),
        Source::Bytes(bytes) => encoding::decode(bytes),
        Source::File(path) => {
            trace!(path = %path.display(), "reading XML source");
            let bytes = std::fs::read(path)?;
            Ok(Cow::Owned(encoding::decode(&bytes)?.into_owned()))
        }
    }
}

/// Parse text into a tree
pub fn parse_tree<'input>(
    text: &'input str,
    options: &LoaderOptions,
) -> Result<Document<'input>> {
    let mut parsing = ParsingOptions::default();
    parsing.allow_dtd = options.allow_dtd;
    parsing.nodes_limit = options.nodes_limit;

    Ok(Document::parse_with_options(text, parsing)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_read_text_strips_bom() {
        let text = read(Source::Text("\u{FEFF}<r/>")).unwrap();
        assert_eq!(text, "<r/>");
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<config><port>80</port></config>").unwrap();

        let text = read(Source::File(file.path())).unwrap();
        assert_eq!(text, "<config><port>80</port></config>");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.xml");
        assert!(matches!(read(Source::File(&missing)), Err(Error::Io(_))));
    }

    #[test]
    fn test_parse_tree() {
        let doc = parse_tree("<root><a/></root>", &LoaderOptions::default()).unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "root");
    }

    #[test]
    fn test_parse_tree_dtd_toggle() {
        let xml = "<!DOCTYPE root [<!ENTITY who \"world\">]><root>&who;</root>";

        let doc = parse_tree(xml, &LoaderOptions::default()).unwrap();
        assert_eq!(doc.root_element().text(), Some("world"));

        let strict = LoaderOptions {
            allow_dtd: false,
            ..LoaderOptions::default()
        };
        assert!(matches!(parse_tree(xml, &strict), Err(Error::MalformedSource(_))));
    }

    #[test]
    fn test_parse_tree_nodes_limit() {
        let options = LoaderOptions {
            nodes_limit: 3,
            ..LoaderOptions::default()
        };
        let result = parse_tree("<r><a/><b/><c/><d/></r>", &options);
        assert!(matches!(result, Err(Error::MalformedSource(_))));
    }
}
