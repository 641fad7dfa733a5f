//! Text Extraction
//!
//! Each source text run and each CDATA section is trimmed on its own, then
//! the pieces are joined. The tree merges a CDATA section into the adjacent
//! text node, so the source behind a text node is split again here.

use std::borrow::Cow;

use crate::dom::Node;
use crate::error::Result;

/// Direct text children of an element, CDATA included
pub const TEXT_NODES: &str = "./text()";

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

#[inline]
fn trim_xml_whitespace(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// Trimmed, non-empty text fragments in document order
pub fn text_fragments(node: Node<'_, '_>) -> Result<Vec<String>> {
    let mut fragments = Vec::new();
    for hit in node.query(TEXT_NODES)? {
        let Some(text_node) = hit.as_node() else {
            continue;
        };
        fragments.extend(
            split_text_node(text_node)
                .into_iter()
                .map(trim_xml_whitespace)
                .filter(|fragment| !fragment.is_empty())
                .map(str::to_string),
        );
    }
    Ok(fragments)
}

/// The element's own text: each fragment trimmed, then concatenated
pub fn element_text(node: Node<'_, '_>) -> Result<String> {
    let mut text = String::new();
    for hit in node.query(TEXT_NODES)? {
        if let Some(text_node) = hit.as_node() {
            for segment in split_text_node(text_node) {
                text.push_str(trim_xml_whitespace(segment));
            }
        }
    }
    Ok(text)
}

/// What a stretch of source text decodes to, when that is known without
/// resolving entity references
enum Segment<'s> {
    Known(Cow<'s, str>),
    Unknown,
}

/// Pieces of a text node's value, one per source text run or CDATA section
fn split_text_node<'a>(node: Node<'a, '_>) -> Vec<&'a str> {
    let Some(text) = node.text() else {
        return Vec::new();
    };

    let raw = node.raw();
    let segments = raw
        .document()
        .input_text()
        .get(raw.range().start..)
        .map(source_segments)
        .unwrap_or_default();

    split_by_segments(text, &segments)
}

/// Text runs and CDATA sections from the start of a text node up to the
/// next markup
fn source_segments(source: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = source;

    loop {
        if let Some(after) = rest.strip_prefix(CDATA_OPEN) {
            let Some(end) = after.find(CDATA_CLOSE) else {
                break;
            };
            segments.push(Segment::Known(normalize_newlines(&after[..end])));
            rest = &after[end + CDATA_CLOSE.len()..];
        } else if rest.is_empty() || rest.starts_with('<') {
            break;
        } else {
            let end = memchr::memchr(b'<', rest.as_bytes()).unwrap_or(rest.len());
            let run = &rest[..end];
            segments.push(if run.contains('&') {
                Segment::Unknown
            } else {
                Segment::Known(normalize_newlines(run))
            });
            rest = &rest[end..];
        }
    }

    segments
}

/// XML end-of-line handling: `\r\n` and lone `\r` become `\n`
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Cut `text` along the decoded segments. Known segments are matched from
/// both ends; at most one unknown segment may remain in the middle. Any
/// mismatch keeps the text whole.
fn split_by_segments<'t>(text: &'t str, segments: &[Segment<'_>]) -> Vec<&'t str> {
    if segments.len() <= 1 {
        return vec![text];
    }

    let mut front = 0;
    let mut head = Vec::with_capacity(segments.len());
    let mut first = 0;
    while let Some(Segment::Known(known)) = segments.get(first) {
        if !text[front..].starts_with(&**known) {
            return vec![text];
        }
        head.push(&text[front..front + known.len()]);
        front += known.len();
        first += 1;
    }

    let mut back = text.len();
    let mut tail = Vec::new();
    let mut last = segments.len();
    while last > first {
        let Segment::Known(known) = &segments[last - 1] else {
            break;
        };
        if !text[front..back].ends_with(&**known) {
            return vec![text];
        }
        tail.push(&text[back - known.len()..back]);
        back -= known.len();
        last -= 1;
    }

    match last - first {
        0 if front == back => {}
        1 => head.push(&text[front..back]),
        _ => return vec![text],
    }

    head.extend(tail.into_iter().rev());
    head
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoaderOptions;
    use crate::dom::XmlDocument;

    fn root_text(xml: &str) -> (String, Vec<String>) {
        let doc = XmlDocument::parse(xml, &LoaderOptions::default()).unwrap();
        let root = doc.root_element().unwrap();
        (element_text(root).unwrap(), text_fragments(root).unwrap())
    }

    #[test]
    fn test_fragments_trimmed_and_joined() {
        let (text, fragments) = root_text("<a>  x <b>inner</b>\n y  </a>");
        assert_eq!(text, "xy");
        assert_eq!(fragments, ["x", "y"]);
    }

    #[test]
    fn test_cdata_counts_as_text() {
        let (text, _) = root_text("<a><![CDATA[ <raw> ]]><!-- note --></a>");
        assert_eq!(text, "<raw>");
    }

    #[test]
    fn test_cdata_next_to_text_is_trimmed_separately() {
        let (text, fragments) = root_text("<a>x <![CDATA[ y ]]></a>");
        assert_eq!(text, "xy");
        assert_eq!(fragments, ["x", "y"]);

        let (text, _) = root_text("<a><![CDATA[ a ]]> b <![CDATA[ c ]]></a>");
        assert_eq!(text, "abc");

        let (text, _) = root_text("<a>x<!--c--> y</a>");
        assert_eq!(text, "xy");
    }

    #[test]
    fn test_entity_run_between_cdata_sections() {
        let (text, fragments) = root_text("<a><![CDATA[ a ]]> &amp; <![CDATA[ c ]]></a>");
        assert_eq!(text, "a&c");
        assert_eq!(fragments, ["a", "&", "c"]);
    }

    #[test]
    fn test_whitespace_only() {
        let (text, fragments) = root_text("<a>\n\t <b/> </a>");
        assert_eq!(text, "");
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_non_breaking_space_is_kept() {
        let (text, _) = root_text("<a>\u{a0}x</a>");
        assert_eq!(text, "\u{a0}x");
    }

    #[test]
    fn test_split_falls_back_to_whole_text() {
        let segments = [Segment::Unknown, Segment::Unknown];
        assert_eq!(split_by_segments("a b", &segments), ["a b"]);

        let segments = [Segment::Known("zz".into()), Segment::Unknown];
        assert_eq!(split_by_segments("a b", &segments), ["a b"]);
    }
}
