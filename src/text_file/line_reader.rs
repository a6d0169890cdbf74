//! line_reader: Decode a byte stream into lines
//!
//! Decoding is incremental, so callers that stop early never pull the
//! rest of the file. `\n`, `\r` and `\r\n` each terminate a line.

use std::io::{self, Read};

use encoding_rs::{Decoder, DecoderResult, Encoding};

const CHUNK_SIZE: usize = 8 * 1024;

/// Iterator over the decoded lines of a reader, separators excluded
pub struct LineReader<R> {
    reader: R,
    decoder: Decoder,
    /// Decoded text; everything before `start` has already been handed out
    pending: String,
    start: usize,
    /// Bytes from `start` up to here hold no separator
    scanned: usize,
    chunk: Box<[u8]>,
    /// Last emitted line ended in `\r`; a leading `\n` belongs to it
    skip_lf: bool,
    done: bool,
    error: Option<io::Error>,
}

impl<R: Read> LineReader<R> {
    pub fn new(reader: R, encoding: &'static Encoding) -> Self {
        LineReader {
            reader,
            decoder: encoding.new_decoder_without_bom_handling(),
            pending: String::new(),
            start: 0,
            scanned: 0,
            chunk: vec![0; CHUNK_SIZE].into_boxed_slice(),
            skip_lf: false,
            done: false,
            error: None,
        }
    }

    /// Split the next complete line off the pending text.
    fn take_line(&mut self) -> Option<String> {
        let bytes = self.pending.as_bytes();

        if self.skip_lf && self.start < bytes.len() {
            if bytes[self.start] == b'\n' {
                self.start += 1;
                self.scanned = self.scanned.max(self.start);
            }
            self.skip_lf = false;
        }

        // Separators are ASCII, so a byte match is always a char boundary
        let found = bytes[self.scanned..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r');
        let end = match found {
            Some(offset) => self.scanned + offset,
            None => {
                self.scanned = bytes.len();
                return None;
            }
        };

        let separator_len = if bytes[end] == b'\r' {
            match bytes.get(end + 1) {
                Some(b'\n') => 2,
                Some(_) => 1,
                None => {
                    self.skip_lf = true;
                    1
                }
            }
        } else {
            1
        };

        let line = self.pending[self.start..end].to_string();
        self.start = end + separator_len;
        self.scanned = self.start;
        Some(line)
    }

    /// Hand out whatever is left after the last separator.
    fn take_remainder(&mut self) -> String {
        let line = self.pending[self.start..].to_string();
        self.reset();
        line
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.start = 0;
        self.scanned = 0;
    }

    /// Drop text that was already handed out.
    fn compact(&mut self) {
        if self.start > 0 {
            self.pending.drain(..self.start);
            self.scanned -= self.start;
            self.start = 0;
        }
    }

    /// Decode the next chunk of input. Returns false once input is exhausted.
    fn fill(&mut self) -> io::Result<bool> {
        let read = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        let last = read == 0;

        self.compact();
        let mut src = &self.chunk[..read];
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length_without_replacement(src.len())
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Input too large"))?;
            self.pending.reserve(needed);

            let (result, consumed) =
                self.decoder
                    .decode_to_string_without_replacement(src, &mut self.pending, last);
            src = &src[consumed..];

            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::OutputFull => continue,
                DecoderResult::Malformed(_, _) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("Malformed {} input", self.decoder.encoding().name()),
                    ));
                }
            }
        }

        Ok(!last)
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.take_line() {
                return Some(Ok(line));
            }

            if let Some(err) = self.error.take() {
                self.reset();
                return Some(Err(err));
            }

            if self.done {
                if self.start >= self.pending.len() {
                    self.reset();
                    return None;
                }
                return Some(Ok(self.take_remainder()));
            }

            match self.fill() {
                Ok(more) => self.done = !more,
                // Lines decoded before the failure are still handed out first
                Err(e) => {
                    self.done = true;
                    self.error = Some(e);
                }
            }
        }
    }
}
