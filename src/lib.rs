//! textfile: Read, write and search text files as ordered lines
//!
//! A [`TextFile`] is bound to one path and one character encoding. Reads
//! return every line without separators, writes replace the whole file,
//! and searches return the first line containing a sequence.

pub mod text_file;

// Re-export text file tools for convenience
pub use text_file::{
    encoding_for_label, Result, TextFile, TextFileConfig, TextFileError, LINE_SEPARATOR,
};

// Encodings are passed straight through from encoding_rs
pub use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
