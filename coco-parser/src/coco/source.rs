//! Source text handling
//!
//! - [`SourceBuffer`] - grammar text with a read cursor
//! - [`LineIndex`] - line start table for offset <-> line/column conversion
//! - [`SourcePosition`] - a 1-based line:column position as reported for tokens
//!
//! Offsets and columns are UTF-8 byte based everywhere in this crate.

mod buffer;
mod line_index;

pub use buffer::SourceBuffer;
pub use line_index::LineIndex;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line:column position inside a grammar file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// True if `self` lies strictly before `other`.
    pub fn is_before(&self, other: &SourcePosition) -> bool {
        self.line < other.line || (self.line == other.line && self.column < other.column)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
