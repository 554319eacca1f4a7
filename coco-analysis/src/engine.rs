//! Request entry point for completion and symbol queries.
//!
//! A [`GrammarSession`] owns the parser scratch space and the tracker, and is reused between
//! requests. [`CompletionEngine`] wraps one session in a mutex so overlapping requests run one
//! at a time, each from `begin` through the snapshot of its results.

use crate::constructs::LegalConstructSet;
use crate::tracker::{CompletionTracker, ReferenceIndex};
use coco_parser::coco::parsing::{GrammarParser, ParseDiagnostic};
use coco_parser::coco::source::SourcePosition;
use coco_parser::coco::symbols::SymbolInfo;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Everything one parse learned about a grammar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrammarSnapshot {
    pub legal_constructs: LegalConstructSet,
    pub grammar_name: Option<SymbolInfo>,
    pub charsets: Vec<SymbolInfo>,
    pub tokens: Vec<SymbolInfo>,
    pub productions: Vec<SymbolInfo>,
    pub references: ReferenceIndex,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl GrammarSnapshot {
    fn capture(tracker: &CompletionTracker, diagnostics: Vec<ParseDiagnostic>) -> Self {
        Self {
            legal_constructs: tracker.legal_constructs(),
            grammar_name: tracker.grammar_name().cloned(),
            charsets: tracker.charsets().to_vec(),
            tokens: tracker.tokens().to_vec(),
            productions: tracker.productions().to_vec(),
            references: tracker.references().clone(),
            diagnostics,
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.grammar_name.iter().any(|info| info.name() == name)
            || [&self.charsets, &self.tokens, &self.productions]
                .into_iter()
                .flatten()
                .any(|info| info.name() == name)
    }

    /// Referenced names that nothing declares, sorted.
    pub fn undeclared_references(&self) -> impl Iterator<Item = &str> + '_ {
        self.references
            .keys()
            .map(String::as_str)
            .filter(|name| !self.is_declared(name))
    }
}

/// Parser and tracker state reused across requests
#[derive(Debug, Default)]
pub struct GrammarSession {
    parser: GrammarParser,
    tracker: CompletionTracker,
}

impl GrammarSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, source: &str, target: Option<SourcePosition>) -> GrammarSnapshot {
        self.tracker.begin(target);
        let outcome = self.parser.parse(source, &mut self.tracker);
        self.tracker.finish(&outcome);
        GrammarSnapshot::capture(&self.tracker, outcome.diagnostics)
    }
}

/// Serialises completion and symbol requests over one shared session.
#[derive(Debug, Default)]
pub struct CompletionEngine {
    session: Mutex<GrammarSession>,
}

impl CompletionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Legal constructs at the 1-based `line`/`column`, plus all symbols.
    pub fn request_completion(
        &self,
        source: &str,
        line: usize,
        column: usize,
        path: &str,
    ) -> GrammarSnapshot {
        debug!(path, line, column, "completion request");
        let target = SourcePosition::new(line, column);
        self.lock().run(source, Some(target))
    }

    /// Symbols only; the legal construct set is always empty.
    pub fn request_symbols(&self, source: &str, path: &str) -> GrammarSnapshot {
        debug!(path, "symbol request");
        self.lock().run(source, None)
    }

    fn lock(&self) -> MutexGuard<'_, GrammarSession> {
        // A panic mid-request leaves nothing half-updated that `begin` does not reset
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
