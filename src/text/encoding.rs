use std::fmt;

use crate::TextError;

/// Byte encodings [`SourceText::from_bytes`](crate::SourceText::from_bytes) can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl Encoding {
    pub fn bom(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            Encoding::Utf16Le => &[0xFF, 0xFE],
            Encoding::Utf16Be => &[0xFE, 0xFF],
        }
    }

    /// Detects a byte order mark, returning the encoding and the BOM's length.
    pub fn detect(bytes: &[u8]) -> Option<(Encoding, usize)> {
        [Encoding::Utf8, Encoding::Utf16Le, Encoding::Utf16Be]
            .into_iter()
            .find(|encoding| bytes.starts_with(encoding.bom()))
            .map(|encoding| (encoding, encoding.bom().len()))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
        })
    }
}

/// Decodes `bytes`, skipping a leading BOM of `encoding` if present.
/// `position` in errors is relative to the start of `bytes`.
pub(super) fn decode(bytes: &[u8], encoding: Encoding) -> Result<String, TextError> {
    let skip = if bytes.starts_with(encoding.bom()) {
        encoding.bom().len()
    } else {
        0
    };
    let body = &bytes[skip..];
    match encoding {
        Encoding::Utf8 => match std::str::from_utf8(body) {
            Ok(text) => Ok(text.to_string()),
            Err(err) => Err(TextError::Decoding {
                encoding,
                position: skip + err.valid_up_to(),
            }),
        },
        Encoding::Utf16Le | Encoding::Utf16Be => {
            if body.len() % 2 != 0 {
                return Err(TextError::Decoding {
                    encoding,
                    position: bytes.len() - 1,
                });
            }
            let units = body.chunks_exact(2).map(|pair| {
                let pair = [pair[0], pair[1]];
                match encoding {
                    Encoding::Utf16Le => u16::from_le_bytes(pair),
                    _ => u16::from_be_bytes(pair),
                }
            });
            let mut text = String::with_capacity(body.len() / 2);
            let mut position = skip;
            for c in char::decode_utf16(units) {
                match c {
                    Ok(c) => {
                        position += c.len_utf16() * 2;
                        text.push(c);
                    }
                    Err(_) => return Err(TextError::Decoding { encoding, position }),
                }
            }
            Ok(text)
        }
    }
}
