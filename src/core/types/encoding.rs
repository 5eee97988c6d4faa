//! Text encodings used for null-terminated strings in target memory

use serde::{Deserialize, Serialize};
use std::fmt;

/// Character encoding of a string stored in the target process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// 7-bit ASCII, bytes above 0x7F decode to `?`
    Ascii,
    /// ISO-8859-1, every byte maps to the code point of the same value
    Latin1,
    #[default]
    Utf8,
    /// UTF-16 little-endian (Windows wide strings)
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    /// Width in bytes of one code unit, and therefore of the null terminator
    pub const fn code_unit_size(&self) -> usize {
        match self {
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => 2,
            _ => 1,
        }
    }

    /// The null terminator appended after each encoded string
    pub fn null_terminator(&self) -> &'static [u8] {
        match self.code_unit_size() {
            2 => &[0, 0],
            _ => &[0],
        }
    }

    /// Decodes the whole buffer, replacing invalid sequences with U+FFFD
    /// (or `?` for ASCII). Embedded nulls are kept as `'\0'`.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            TextEncoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
        }
    }

    /// Encodes `text` without any terminator. Characters the encoding
    /// cannot represent become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            TextEncoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        }
    }

    /// Encodes `text` followed by a single null terminator
    pub fn encode_terminated(&self, text: &str) -> Vec<u8> {
        let mut bytes = self.encode(text);
        bytes.extend_from_slice(self.null_terminator());
        bytes
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();
    let units = chunks.map(|pair| unit([pair[0], pair[1]]));

    let mut text: String = char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Ascii => "ascii",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
        };
        f.write_str(name)
    }
}
