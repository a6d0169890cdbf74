//! charset: Resolve and apply the fixed encoding of a text file
//!
//! Decoding is done directly with `encoding_rs` decoders. Encoding needs a
//! thin wrapper because `encoding_rs` only decodes UTF-16; its UTF-16
//! encoders produce UTF-8.

use std::io;

use encoding_rs::{Encoder, EncoderResult, Encoding, REPLACEMENT, UTF_16BE, UTF_16LE};

use super::error::{Result, TextFileError};

/// Resolve a WHATWG encoding label such as `"utf-8"` or `"iso-8859-1"`.
///
/// Labels are matched case-insensitively with surrounding whitespace ignored.
/// An empty label counts as a missing encoding.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    let label = label.trim();
    if label.is_empty() {
        return Err(TextFileError::InvalidArgument(
            "File encoding cannot be empty".to_string(),
        ));
    }

    let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        TextFileError::InvalidArgument(format!("Unknown file encoding: {}", label))
    })?;

    ensure_usable(encoding)
}

/// Reject encodings that cannot round-trip text.
pub(crate) fn ensure_usable(encoding: &'static Encoding) -> Result<&'static Encoding> {
    if encoding == REPLACEMENT {
        return Err(TextFileError::InvalidArgument(format!(
            "File encoding is not usable for text files: {}",
            encoding.name()
        )));
    }

    Ok(encoding)
}

/// Encodes UTF-8 text into the bytes of a fixed encoding.
pub(crate) enum CharsetEncoder {
    Utf16 { big_endian: bool },
    Standard(Encoder),
}

impl CharsetEncoder {
    pub(crate) fn new(encoding: &'static Encoding) -> Self {
        if encoding == UTF_16LE {
            CharsetEncoder::Utf16 { big_endian: false }
        } else if encoding == UTF_16BE {
            CharsetEncoder::Utf16 { big_endian: true }
        } else {
            CharsetEncoder::Standard(encoding.new_encoder())
        }
    }

    /// Append the encoded form of `text` to `dst`.
    ///
    /// `last` must be set on the final call so stateful encoders can emit
    /// their closing sequence.
    pub(crate) fn encode(&mut self, text: &str, dst: &mut Vec<u8>, last: bool) -> io::Result<()> {
        match self {
            CharsetEncoder::Utf16 { big_endian } => {
                dst.reserve(text.len() * 2);
                for unit in text.encode_utf16() {
                    let bytes = if *big_endian {
                        unit.to_be_bytes()
                    } else {
                        unit.to_le_bytes()
                    };
                    dst.extend_from_slice(&bytes);
                }
                Ok(())
            }
            CharsetEncoder::Standard(encoder) => {
                let mut src = text;
                loop {
                    let needed = encoder
                        .max_buffer_length_from_utf8_without_replacement(src.len())
                        .ok_or_else(|| {
                            io::Error::new(io::ErrorKind::InvalidInput, "Line too long to encode")
                        })?;
                    dst.reserve(needed);

                    let (result, read) =
                        encoder.encode_from_utf8_to_vec_without_replacement(src, dst, last);
                    src = &src[read..];

                    match result {
                        EncoderResult::InputEmpty => return Ok(()),
                        EncoderResult::OutputFull => continue,
                        EncoderResult::Unmappable(c) => {
                            return Err(io::Error::new(
                                io::ErrorKind::InvalidData,
                                format!(
                                    "Character {:?} cannot be encoded as {}",
                                    c,
                                    encoder.encoding().name()
                                ),
                            ));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};

    #[test]
    fn test_label_lookup() {
        assert_eq!(encoding_for_label("utf-8").unwrap(), UTF_8);
        assert_eq!(encoding_for_label("  UTF8 ").unwrap(), UTF_8);
        // WHATWG maps the Latin-1 labels onto windows-1252
        assert_eq!(encoding_for_label("iso-8859-1").unwrap(), WINDOWS_1252);
        assert_eq!(encoding_for_label("Shift_JIS").unwrap(), SHIFT_JIS);
    }

    #[test]
    fn test_label_rejections() {
        assert!(matches!(
            encoding_for_label(""),
            Err(TextFileError::InvalidArgument(_))
        ));
        assert!(matches!(
            encoding_for_label("klingon-8"),
            Err(TextFileError::InvalidArgument(_))
        ));
        assert!(matches!(
            encoding_for_label("iso-2022-kr"),
            Err(TextFileError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encode_latin1() {
        let mut encoder = CharsetEncoder::new(WINDOWS_1252);
        let mut out = Vec::new();
        encoder.encode("café", &mut out, true).unwrap();
        assert_eq!(out, b"caf\xe9");
    }

    #[test]
    fn test_encode_utf16() {
        let mut out = Vec::new();
        CharsetEncoder::new(UTF_16LE).encode("hé", &mut out, true).unwrap();
        assert_eq!(out, vec![0x68, 0x00, 0xe9, 0x00]);

        out.clear();
        CharsetEncoder::new(UTF_16BE).encode("hé", &mut out, true).unwrap();
        assert_eq!(out, vec![0x00, 0x68, 0x00, 0xe9]);
    }

    #[test]
    fn test_encode_unmappable() {
        let mut encoder = CharsetEncoder::new(WINDOWS_1252);
        let mut out = Vec::new();
        let err = encoder.encode("snow ☃", &mut out, true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
