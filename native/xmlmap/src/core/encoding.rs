//! XML Encoding Detection and Conversion
//!
//! Detects UTF-16 input from its byte order mark or leading byte pattern and
//! hands the parser UTF-8 text. Anything else must already be UTF-8.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Encoding of raw XML input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        match input {
            [0xFF, 0xFE, ..] | [b'<', 0x00, ..] => XmlEncoding::Utf16Le,
            [0xFE, 0xFF, ..] | [0x00, b'<', ..] => XmlEncoding::Utf16Be,
            _ => XmlEncoding::Utf8,
        }
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode raw input into UTF-8 text
///
/// UTF-8 input is borrowed (minus its BOM); UTF-16 input is converted.
pub fn decode(input: &[u8]) -> Result<Cow<'_, str>> {
    match XmlEncoding::detect(input) {
        XmlEncoding::Utf8 => {
            let bytes = input.strip_prefix(UTF8_BOM).unwrap_or(input);
            std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|e| Error::Encoding(format!("invalid UTF-8: {e}")))
        }
        XmlEncoding::Utf16Le => decode_utf16(input, &[0xFF, 0xFE], u16::from_le_bytes, "LE"),
        XmlEncoding::Utf16Be => decode_utf16(input, &[0xFE, 0xFF], u16::from_be_bytes, "BE"),
    }
}

fn decode_utf16<'a>(
    input: &'a [u8],
    bom: &[u8],
    unit: fn([u8; 2]) -> u16,
    label: &str,
) -> Result<Cow<'a, str>> {
    let bytes = input.strip_prefix(bom).unwrap_or(input);

    if bytes.len() % 2 != 0 {
        return Err(Error::Encoding(format!(
            "invalid UTF-16 {label}: odd number of bytes"
        )));
    }

    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&code_units)
        .map(Cow::Owned)
        .map_err(|e| Error::Encoding(format!("invalid UTF-16 {label}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str, bom: &[u8], big_endian: bool) -> Vec<u8> {
        let mut out = bom.to_vec();
        for unit in text.encode_utf16() {
            let pair = if big_endian { unit.to_be_bytes() } else { unit.to_le_bytes() };
            out.extend_from_slice(&pair);
        }
        out
    }

    #[test]
    fn test_detect() {
        assert_eq!(XmlEncoding::detect(b"<root/>"), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(&[0xEF, 0xBB, 0xBF, b'<']), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(&[0xFF, 0xFE, b'<', 0x00]), XmlEncoding::Utf16Le);
        assert_eq!(XmlEncoding::detect(&[0xFE, 0xFF, 0x00, b'<']), XmlEncoding::Utf16Be);
        assert_eq!(XmlEncoding::detect(&[b'<', 0x00]), XmlEncoding::Utf16Le);
        assert_eq!(XmlEncoding::detect(b""), XmlEncoding::Utf8);
    }

    #[test]
    fn test_utf8_is_borrowed() {
        let text = decode(b"<root>hello</root>").unwrap();
        assert!(matches!(text, Cow::Borrowed("<root>hello</root>")));
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let text = decode(b"\xEF\xBB\xBF<r/>").unwrap();
        assert_eq!(text, "<r/>");
    }

    #[test]
    fn test_utf16_both_orders() {
        let le = utf16("<r>ü</r>", &[0xFF, 0xFE], false);
        assert_eq!(decode(&le).unwrap(), "<r>ü</r>");

        let be = utf16("<r>ü</r>", &[0xFE, 0xFF], true);
        assert_eq!(decode(&be).unwrap(), "<r>ü</r>");

        let no_bom = utf16("<r/>", &[], false);
        assert_eq!(decode(&no_bom).unwrap(), "<r/>");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(decode(&[0xFF, 0xFE, b'<']), Err(Error::Encoding(_))));
        assert!(matches!(decode(b"<r>\xC3\x28</r>"), Err(Error::Encoding(_))));
    }
}
