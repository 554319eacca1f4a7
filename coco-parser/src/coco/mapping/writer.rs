use super::position_map::PositionMap;
use std::io::{self, Write};

/// Output sink that knows the zero-based line and column of the next byte it writes.
///
/// Line breaks are counted the same way [`LineIndex`](crate::coco::source::LineIndex) counts
/// them, so positions line up with what a compiler reports against the written file.
#[derive(Debug)]
pub struct TrackingWriter<W: Write> {
    inner: W,
    line: usize,
    column: usize,
    pending_cr: bool,
}

impl<W: Write> TrackingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            line: 0,
            column: 0,
            pending_cr: false,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(text.as_bytes())?;
        for byte in text.bytes() {
            self.advance(byte);
        }
        Ok(())
    }

    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write_str(text)?;
        self.write_str("\n")
    }

    /// Copy a grammar fragment that starts at grammar `line`/`column` (zero-based), recording
    /// one run per output line.
    pub fn write_mapped(
        &mut self,
        text: &str,
        line: usize,
        column: usize,
        map: &mut PositionMap,
    ) -> io::Result<()> {
        let mut source_line = line;
        let mut source_column = column;
        for (segment, terminator) in split_lines(text) {
            if !segment.is_empty() {
                map.record(
                    self.line,
                    self.column,
                    source_line,
                    source_column,
                    segment.len(),
                );
            }
            self.write_str(segment)?;
            if !terminator.is_empty() {
                self.write_str(terminator)?;
                source_line += 1;
                source_column = 0;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn advance(&mut self, byte: u8) {
        match byte {
            // second half of `\r\n`
            b'\n' if self.pending_cr => self.pending_cr = false,
            b'\n' => {
                self.line += 1;
                self.column = 0;
            }
            b'\r' => {
                self.line += 1;
                self.column = 0;
                self.pending_cr = true;
            }
            _ => {
                self.column += 1;
                self.pending_cr = false;
            }
        }
    }
}

/// Split into `(line, terminator)` pairs; the terminator is empty for the last line.
fn split_lines(text: &str) -> Vec<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let terminator_len = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
            b'\r' | b'\n' => 1,
            _ => 0,
        };
        if terminator_len > 0 {
            parts.push((&text[start..i], &text[i..i + terminator_len]));
            i += terminator_len;
            start = i;
        } else {
            i += 1;
        }
    }
    parts.push((&text[start..], ""));
    parts
}
