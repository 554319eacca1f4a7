use super::{SourceBuffer, SourcePosition};

/// Line start table for a buffer snapshot.
///
/// `\r\n`, a lone `\r` and a lone `\n` each count as exactly one line break. Lines and columns
/// returned by [`LineIndex::position_to_line`] are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Build the table for a piece of text.
    pub fn new(text: &str) -> Self {
        let mut buffer = SourceBuffer::new(text);
        Self::scan(&mut buffer)
    }

    /// Scan a buffer from the start. The buffer's cursor is left where the caller had it.
    pub fn scan(buffer: &mut SourceBuffer) -> Self {
        buffer.preserving_cursor(|buf| {
            buf.set_pos(0);
            let mut line_starts = vec![0];
            while let Some(ch) = buf.read() {
                let line_break = match ch {
                    '\n' => true,
                    '\r' => buf.peek() != Some('\n'),
                    _ => false,
                };
                if line_break {
                    line_starts.push(buf.pos());
                }
            }
            Self {
                line_starts,
                len: buf.pos(),
            }
        })
    }

    /// Convert an absolute offset into a zero-based `(line, column)` pair.
    pub fn position_to_line(&self, offset: usize) -> (usize, usize) {
        // line_starts[0] == 0, so at least one start is <= offset
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        (line, offset - self.line_starts[line])
    }

    /// Convert an offset into the 1-based position used for tokens.
    pub fn source_position(&self, offset: usize) -> SourcePosition {
        let (line, column) = self.position_to_line(offset);
        SourcePosition::new(line + 1, column + 1)
    }

    /// Inverse of [`LineIndex::position_to_line`]. Columns may address the line terminator;
    /// anything past it is rejected.
    pub fn line_to_offset(&self, line: usize, column: usize) -> Option<usize> {
        let start = *self.line_starts.get(line)?;
        let offset = start.checked_add(column)?;
        match self.line_starts.get(line + 1) {
            Some(&next) if offset < next => Some(offset),
            Some(_) => None,
            None if offset <= self.len => Some(offset),
            None => None,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Length of the scanned text in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
