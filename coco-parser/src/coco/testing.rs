//! Testing utilities
//!
//!     Hand-written grammar snippets are easy to get subtly wrong, and a test against an
//!     invalid grammar tunes the code to the wrong thing. Tests should therefore prefer the
//!     verified sample grammars in `samples/` (through [`Samples`]) and keep inline grammars
//!     small enough to check by eye.
//!
//!     Completion tests need a cursor. Mark it with [`CURSOR`] inside the grammar text and let
//!     [`with_cursor`] strip it and report the position:
//!
//!     ```rust,ignore
//!     let (source, cursor) = with_cursor("COMPILER Foo PRODUCTIONS $0A = \"x\" . END Foo.");
//!     ```
//!
//!     [`CheckpointRecorder`] captures the checkpoint stream of a parse for assertions.

use crate::coco::parsing::{parse_grammar, Checkpoint, ParseObserver, ParseOutcome, ParseState};
use crate::coco::source::{LineIndex, SourcePosition};

/// Cursor marker understood by [`with_cursor`]
pub const CURSOR: &str = "$0";

/// Verified sample grammars
pub struct Samples;

impl Samples {
    /// The smallest complete grammar
    pub fn minimal() -> &'static str {
        include_str!("../../samples/minimal.atg")
    }

    /// The classic Taste language: attributes, semantic actions, comments, ignore sets
    pub fn taste() -> &'static str {
        include_str!("../../samples/taste.atg")
    }

    /// Resolvers, WEAK, SYNC, CONTEXT, pragmas and IGNORECASE
    pub fn resolvers() -> &'static str {
        include_str!("../../samples/resolvers.atg")
    }

    pub fn all() -> [(&'static str, &'static str); 3] {
        [
            ("minimal.atg", Self::minimal()),
            ("taste.atg", Self::taste()),
            ("resolvers.atg", Self::resolvers()),
        ]
    }
}

/// Remove the single [`CURSOR`] marker and return the clean text with the marker's 1-based
/// position.
///
/// Panics when the marker is missing, this is test support only.
pub fn with_cursor(marked: &str) -> (String, SourcePosition) {
    let offset = marked
        .find(CURSOR)
        .unwrap_or_else(|| panic!("no cursor marker {CURSOR} in {marked:?}"));
    let source = marked.replacen(CURSOR, "", 1);
    let position = LineIndex::new(&source).source_position(offset);
    (source, position)
}

/// One recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCheckpoint {
    pub checkpoint: Checkpoint,
    pub name: String,
    pub current: SourcePosition,
    pub error_count: usize,
}

/// Observer that keeps every notification
#[derive(Debug, Default)]
pub struct CheckpointRecorder {
    pub recorded: Vec<RecordedCheckpoint>,
}

impl CheckpointRecorder {
    pub fn record(source: &str) -> (Self, ParseOutcome) {
        let mut recorder = Self::default();
        let outcome = parse_grammar(source, &mut recorder);
        (recorder, outcome)
    }

    pub fn ids(&self) -> Vec<i32> {
        self.recorded.iter().map(|r| r.checkpoint.id()).collect()
    }

    /// Names announced at checkpoints of one kind, in order.
    pub fn names_at(&self, checkpoint: Checkpoint) -> Vec<&str> {
        self.recorded
            .iter()
            .filter(|r| r.checkpoint == checkpoint)
            .map(|r| r.name.as_str())
            .collect()
    }
}

impl ParseObserver for CheckpointRecorder {
    fn notify(&mut self, checkpoint: Checkpoint, state: &ParseState<'_>) {
        self.recorded.push(RecordedCheckpoint {
            checkpoint,
            name: state.lookahead_name().to_string(),
            current: state.current,
            error_count: state.error_count,
        });
    }
}
