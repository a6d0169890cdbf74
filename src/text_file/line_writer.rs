//! line_writer: Encode lines into a byte sink
//!
//! Every line is sanitized, terminated with the platform separator and
//! encoded with the file's fixed encoding.

use std::io::{self, Write};

use encoding_rs::Encoding;

use super::charset::CharsetEncoder;

/// Platform line terminator appended after every line
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Literal backslash-n escape removed from written lines
const ESCAPED_NEWLINE: &str = "\\n";

/// Remove literal `\n` escapes from a line. Real control characters are kept.
pub fn sanitize_line(line: &str) -> String {
    line.replace(ESCAPED_NEWLINE, "")
}

pub struct LineWriter<W: Write> {
    writer: W,
    encoder: CharsetEncoder,
    buf: Vec<u8>,
    lines_written: usize,
}

impl<W: Write> LineWriter<W> {
    pub fn new(writer: W, encoding: &'static Encoding) -> Self {
        LineWriter {
            writer,
            encoder: CharsetEncoder::new(encoding),
            buf: Vec::new(),
            lines_written: 0,
        }
    }

    /// Write one sanitized, terminated line
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.buf.clear();
        self.encoder.encode(&sanitize_line(line), &mut self.buf, false)?;
        self.encoder.encode(LINE_SEPARATOR, &mut self.buf, false)?;
        self.writer.write_all(&self.buf)?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Close the encoder state and flush. Returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.buf.clear();
        self.encoder.encode("", &mut self.buf, true)?;
        self.writer.write_all(&self.buf)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{ISO_2022_JP, UTF_8, WINDOWS_1252};

    fn write_all(lines: &[&str], encoding: &'static Encoding) -> io::Result<Vec<u8>> {
        let mut writer = LineWriter::new(Vec::new(), encoding);
        for line in lines {
            writer.write_line(line)?;
        }
        writer.finish()
    }

    #[test]
    fn test_sanitize_line() {
        assert_eq!(sanitize_line("a\\nb"), "ab");
        assert_eq!(sanitize_line("\\n\\n"), "");
        assert_eq!(sanitize_line("tab\there"), "tab\there");
        assert_eq!(sanitize_line("back\\slash"), "back\\slash");
    }

    #[test]
    fn test_lines_are_terminated() {
        let out = write_all(&["hello", "", "world!"], UTF_8).unwrap();
        let expected = format!("hello{0}{0}world!{0}", LINE_SEPARATOR);
        assert_eq!(out, expected.into_bytes());
    }

    #[test]
    fn test_no_lines_no_bytes() {
        assert!(write_all(&[], UTF_8).unwrap().is_empty());
    }

    #[test]
    fn test_counts_lines() {
        let mut writer = LineWriter::new(Vec::new(), UTF_8);
        writer.write_line("a").unwrap();
        writer.write_line("b").unwrap();
        assert_eq!(writer.lines_written(), 2);
    }

    #[test]
    fn test_escape_removed_before_encoding() {
        let out = write_all(&["caf\\né"], WINDOWS_1252).unwrap();
        let mut expected = b"caf\xe9".to_vec();
        expected.extend_from_slice(LINE_SEPARATOR.as_bytes());
        assert_eq!(out, expected);
    }

    #[test]
    fn test_stateful_encoder_is_closed() {
        let out = write_all(&["日本"], ISO_2022_JP).unwrap();
        // Ends back in ASCII mode after the final separator
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("\u{1b}$B"));
        assert!(text.contains("\u{1b}(B"));
    }

    #[test]
    fn test_unmappable_character() {
        let mut writer = LineWriter::new(Vec::new(), WINDOWS_1252);
        let err = writer.write_line("☃").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
