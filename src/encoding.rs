//! Decoding raw input to UTF-8 text using simdutf8, chardetng and
//! `encoding_rs`.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use simdutf8::basic::from_utf8;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Input decoded to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText<'a> {
    /// The text, without any byte order mark.
    pub text: Cow<'a, str>,
    /// Name of the source encoding.
    pub encoding: &'static str,
    /// Whether a byte order mark was present.
    pub had_bom: bool,
    /// Whether the input had to be converted.
    pub transcoded: bool,
}

/// Check if the given bytes are valid UTF-8 (SIMD-accelerated).
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Decode `data` to UTF-8 text.
///
/// UTF-16 input is recognised by its byte order mark. Valid UTF-8 is
/// borrowed as-is (minus a BOM). Anything else is guessed with chardetng
/// and converted; undecodable bytes become U+FFFD.
pub fn decode_text(data: &[u8]) -> DecodedText<'_> {
    if data.starts_with(&[0xFF, 0xFE]) || data.starts_with(&[0xFE, 0xFF]) {
        let encoding = if data[0] == 0xFF {
            encoding_rs::UTF_16LE
        } else {
            encoding_rs::UTF_16BE
        };
        // decode() sniffs and drops the BOM itself
        let (text, _, _) = encoding.decode(data);
        return DecodedText {
            text: Cow::Owned(text.into_owned()),
            encoding: encoding.name(),
            had_bom: true,
            transcoded: true,
        };
    }

    let had_bom = data.starts_with(UTF8_BOM);
    let body = if had_bom { &data[UTF8_BOM.len()..] } else { data };

    if let Ok(text) = from_utf8(body) {
        return DecodedText {
            text: Cow::Borrowed(text),
            encoding: encoding_rs::UTF_8.name(),
            had_bom,
            transcoded: false,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        tracing::warn!(encoding = encoding.name(), "input contained undecodable bytes");
    }

    DecodedText {
        text: Cow::Owned(text.into_owned()),
        encoding: encoding.name(),
        had_bom,
        transcoded: encoding != encoding_rs::UTF_8,
    }
}
