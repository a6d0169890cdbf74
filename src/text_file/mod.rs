//! Text file tools: whole-file line I/O with a fixed encoding
//!
//! All operations use the REAL filesystem and hold no handles between calls.

mod charset;
mod config;
mod error;
mod handler;
mod line_reader;
mod line_writer;

pub use charset::encoding_for_label;
pub use config::{TextFileConfig, DEFAULT_ENCODING};
pub use error::{Result, TextFileError};
pub use handler::TextFile;
pub use line_reader::LineReader;
pub use line_writer::{sanitize_line, LineWriter, LINE_SEPARATOR};
