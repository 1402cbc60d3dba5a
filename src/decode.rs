//! Decoding the bytes of a TJA file into text.
//!
//! TJA files in the wild are written in UTF-8 (often with BOM) or Shift_JIS. The encodings are tried in that
//! order, and the UTF-8 with replacement characters is the last resort, so decoding never fails.

use std::borrow::Cow;

use encoding_rs::{SHIFT_JIS, UTF_8};

/// The encoding the source was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceEncoding {
    /// Valid UTF-8, with or without BOM.
    Utf8,
    /// Valid Shift_JIS.
    ShiftJis,
    /// Invalid in both. Malformed sequences are replaced with `U+FFFD`.
    Utf8Lossy,
}

/// Decoded source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'a> {
    /// The text without BOM.
    pub text: Cow<'a, str>,
    /// The encoding detected.
    pub encoding: SourceEncoding,
}

/// Decodes the bytes of a TJA file.
#[must_use]
pub fn decode(bytes: &[u8]) -> Decoded<'_> {
    let without_bom = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(without_bom) {
        return Decoded {
            text: Cow::Borrowed(text),
            encoding: SourceEncoding::Utf8,
        };
    }
    if let Some(text) = SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes) {
        return Decoded {
            text,
            encoding: SourceEncoding::ShiftJis,
        };
    }
    let (text, _) = UTF_8.decode_without_bom_handling(without_bom);
    Decoded {
        text,
        encoding: SourceEncoding::Utf8Lossy,
    }
}
