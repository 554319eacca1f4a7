//! Declaration and reference records collected while a grammar is parsed

use crate::coco::source::SourcePosition;
use serde::{Deserialize, Serialize};

/// One occurrence of a grammar symbol.
///
/// `context` names the enclosing charset/token/production declaration for references and is
/// empty for declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolInfo {
    name: String,
    line: usize,
    column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl SymbolInfo {
    pub fn new(name: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            name: name.into(),
            line,
            column,
            context: None,
        }
    }

    pub fn with_context(
        name: impl Into<String>,
        line: usize,
        column: usize,
        context: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            line,
            column,
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based line
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }

    /// Position just past the last character of the name, on the same line.
    pub fn end_position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column + self.name.len())
    }
}
