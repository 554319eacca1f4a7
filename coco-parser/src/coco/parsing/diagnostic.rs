use crate::coco::source::SourcePosition;
use serde::Serialize;
use std::fmt;

/// A syntax error found while parsing a grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseDiagnostic {
    pub fn new(position: SourcePosition, message: impl Into<String>) -> Self {
        Self {
            line: position.line,
            column: position.column,
            message: message.into(),
        }
    }

    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }
}

/// Same shape the generator prints its own errors in.
impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-- line {} col {}: {}", self.line, self.column, self.message)
    }
}

/// Result of one parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParseOutcome {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn first_error(&self) -> Option<SourcePosition> {
        self.diagnostics.first().map(ParseDiagnostic::position)
    }
}
