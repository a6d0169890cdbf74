//! handler: Whole-file line access bound to one path and one encoding
//!
//! A `TextFile` holds no open resources. Every operation opens its own
//! handle and releases it on every exit path.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::{debug, warn};

use super::charset::{encoding_for_label, ensure_usable};
use super::config::TextFileConfig;
use super::error::{Result, TextFileError};
use super::line_reader::LineReader;
use super::line_writer::LineWriter;

/// Handles a text file as an ordered list of lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    path: PathBuf,
    encoding: &'static Encoding,
}

impl TextFile {
    /// Bind a handler to `path` and `encoding`
    ///
    /// The file does not need to exist yet; nothing touches the filesystem here.
    ///
    /// # Errors
    /// * `InvalidArgument` - if `path` is empty or `encoding` cannot encode text
    ///
    /// # Examples
    /// ```ignore
    /// use textfile::TextFile;
    ///
    /// let file = TextFile::new("notes.txt", encoding_rs::UTF_8)?;
    /// file.write_lines(["hello", "world!"])?;
    /// ```
    pub fn new(path: impl Into<PathBuf>, encoding: &'static Encoding) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(TextFileError::InvalidArgument(
                "Text file path cannot be empty".to_string(),
            ));
        }

        let encoding = ensure_usable(encoding)?;
        Ok(TextFile { path, encoding })
    }

    /// Bind a handler using an encoding label such as `"iso-8859-1"`
    pub fn with_encoding_label(path: impl Into<PathBuf>, label: &str) -> Result<Self> {
        let encoding = encoding_for_label(label)?;
        Self::new(path, encoding)
    }

    pub fn from_config(config: &TextFileConfig) -> Result<Self> {
        Self::with_encoding_label(config.path.clone(), &config.encoding)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Whether the file exists. Fails if its status cannot be checked.
    pub fn exists(&self) -> Result<bool> {
        self.path
            .try_exists()
            .map_err(|e| self.io_failure("stat", e))
    }

    /// Read every line of the file, in order, without separators
    ///
    /// # Errors
    /// * `InvalidState` - if the file does not exist
    /// * `Io` - if opening, reading or decoding fails
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let lines = self
            .open_lines()?
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| self.io_failure("read", e))?;

        debug!(path = %self.path.display(), lines = lines.len(), "read lines");
        Ok(lines)
    }

    /// Replace the file contents with `lines`
    ///
    /// Deletes the file if present and creates missing parent directories
    /// before writing. Literal `\n` escapes are stripped from every line and
    /// each line gets one platform separator. No atomic-replace guarantee:
    /// on failure the file may be missing, empty or partially written.
    ///
    /// # Errors
    /// * `Io` - if deleting, creating directories, encoding or writing fails
    pub fn write_lines<I, S>(&self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.prepare_output()
            .map_err(|e| self.io_failure("prepare", e))?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_failure("open", e))?;
        let mut writer = LineWriter::new(BufWriter::new(file), self.encoding);

        for line in lines {
            writer
                .write_line(line.as_ref())
                .map_err(|e| self.io_failure("write", e))?;
        }

        let written = writer.lines_written();
        writer.finish().map_err(|e| self.io_failure("flush", e))?;

        debug!(path = %self.path.display(), lines = written, "wrote lines");
        Ok(())
    }

    /// Find the first line containing `sequence`
    ///
    /// Matching is a case-sensitive substring test. Scanning stops at the
    /// first match; `None` means no line contains the sequence.
    ///
    /// # Errors
    /// * `InvalidState` - if the file does not exist
    /// * `Io` - if opening, reading or decoding fails
    pub fn find_line_containing(&self, sequence: &str) -> Result<Option<String>> {
        for line in self.open_lines()? {
            let line = line.map_err(|e| self.io_failure("search", e))?;
            if line.contains(sequence) {
                debug!(path = %self.path.display(), sequence, "found matching line");
                return Ok(Some(line));
            }
        }

        debug!(path = %self.path.display(), sequence, "no line matched");
        Ok(None)
    }

    fn open_lines(&self) -> Result<LineReader<BufReader<File>>> {
        if !self.exists()? {
            return Err(TextFileError::InvalidState(
                "Cannot read from a non-existent file".to_string(),
            ));
        }

        let file = File::open(&self.path).map_err(|e| self.io_failure("open", e))?;
        Ok(LineReader::new(BufReader::new(file), self.encoding))
    }

    fn prepare_output(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(())
    }

    fn io_failure(&self, operation: &str, err: io::Error) -> TextFileError {
        warn!(
            path = %self.path.display(),
            encoding = self.encoding.name(),
            operation,
            error = %err,
            "text file operation failed"
        );
        TextFileError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{REPLACEMENT, UTF_8};

    #[test]
    fn test_new_rejects_empty_path() {
        let result = TextFile::new("", UTF_8);
        assert!(matches!(result, Err(TextFileError::InvalidArgument(_))));
    }

    #[test]
    fn test_new_rejects_replacement_encoding() {
        let result = TextFile::new("a.txt", REPLACEMENT);
        assert!(matches!(result, Err(TextFileError::InvalidArgument(_))));
    }

    #[test]
    fn test_new_does_not_touch_filesystem() {
        let file = TextFile::new("/definitely/not/here/file.txt", UTF_8).unwrap();
        assert!(!file.exists().unwrap());
        assert_eq!(file.path(), Path::new("/definitely/not/here/file.txt"));
        assert_eq!(file.encoding(), UTF_8);
    }

    #[test]
    fn test_with_encoding_label() {
        let file = TextFile::with_encoding_label("a.txt", "latin1").unwrap();
        assert_eq!(file.encoding().name(), "windows-1252");

        let result = TextFile::with_encoding_label("a.txt", "");
        assert!(matches!(result, Err(TextFileError::InvalidArgument(_))));
    }

    #[test]
    fn test_handlers_compare_by_value() {
        let a = TextFile::new("a.txt", UTF_8).unwrap();
        assert_eq!(a.clone(), a);
        assert_ne!(a, TextFile::new("b.txt", UTF_8).unwrap());
    }
}
