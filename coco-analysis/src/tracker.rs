//! Completion tracker
//!
//!     The tracker rides along a parse of the grammar. From the checkpoint stream it keeps
//!     two things:
//!
//!         1. Every declared charset, token, production and the grammar name, plus every
//!            identifier reference tagged with the declaration it appears in.
//!         2. The last checkpoint whose current token lies strictly before the target
//!            cursor, together with the braces opened (and not closed) before it.
//!
//!     The legal constructs at the cursor follow from (2) through
//!     [`constructs_for`](crate::legality::constructs_for).
//!
//!     Once the parser reports an error the tracker stops listening. Symbols after the error
//!     are not collected, and if the error lies before the cursor the answer becomes the empty
//!     set: the text the user is editing does not parse up to the cursor, so nothing can be
//!     said about it.

use crate::braces::BraceStack;
use crate::constructs::LegalConstructSet;
use crate::legality::constructs_for;
use coco_parser::coco::parsing::{
    BraceKind, Checkpoint, DeclarationKind, ParseObserver, ParseOutcome, ParseState,
};
use coco_parser::coco::source::SourcePosition;
use coco_parser::coco::symbols::SymbolInfo;
use std::collections::BTreeMap;
use tracing::debug;

/// Identifier uses by name, in source order. Names iterate sorted.
pub type ReferenceIndex = BTreeMap<String, Vec<SymbolInfo>>;

#[derive(Debug, Default, Clone)]
pub struct CompletionTracker {
    target: Option<SourcePosition>,
    last: Option<Checkpoint>,
    braces: BraceStack,
    frozen: bool,
    /// Name of the declaration currently being parsed
    context: Option<String>,
    grammar_name: Option<SymbolInfo>,
    charsets: Vec<SymbolInfo>,
    tokens: Vec<SymbolInfo>,
    productions: Vec<SymbolInfo>,
    references: ReferenceIndex,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new parse. `None` collects symbols only.
    pub fn begin(&mut self, target: Option<SourcePosition>) {
        self.target = target;
        self.last = None;
        self.braces.clear();
        self.frozen = false;
        self.context = None;
        self.grammar_name = None;
        self.charsets.clear();
        self.tokens.clear();
        self.productions.clear();
        self.references.clear();
    }

    pub fn on_checkpoint(&mut self, checkpoint: Checkpoint, state: &ParseState<'_>) {
        if state.has_errors() {
            if !self.frozen {
                debug!(%checkpoint, first_error = ?state.first_error, "tracker frozen by syntax error");
                self.frozen = true;
            }
            self.discard_if_error_before_target(state.first_error);
            return;
        }

        let name = state.lookahead_name();
        if let Some(position) = state.lookahead_position().filter(|_| !name.is_empty()) {
            if let Some(kind) = checkpoint.declaration() {
                self.declare(kind, SymbolInfo::new(name, position.line, position.column));
            } else if checkpoint.is_reference() {
                let info = SymbolInfo::with_context(
                    name,
                    position.line,
                    position.column,
                    self.context.clone(),
                );
                self.references.entry(name.to_string()).or_default().push(info);
            }
        }

        let Some(target) = self.target else {
            return;
        };
        if state.current.is_before(&target) {
            if let Some(event) = checkpoint.brace_event() {
                self.braces.apply(event);
            }
            self.last = Some(checkpoint);
        }
    }

    /// Apply the final parse result; covers errors reported after the last checkpoint.
    pub fn finish(&mut self, outcome: &ParseOutcome) {
        self.discard_if_error_before_target(outcome.first_error());
    }

    fn discard_if_error_before_target(&mut self, first_error: Option<SourcePosition>) {
        if let (Some(error), Some(target)) = (first_error, self.target) {
            if error.is_before(&target) {
                self.last = None;
            }
        }
    }

    fn declare(&mut self, kind: DeclarationKind, info: SymbolInfo) {
        self.context = Some(info.name().to_string());
        match kind {
            DeclarationKind::Grammar => self.grammar_name = Some(info),
            DeclarationKind::CharSet => self.charsets.push(info),
            DeclarationKind::Token => self.tokens.push(info),
            DeclarationKind::Production => self.productions.push(info),
        }
    }

    pub fn legal_constructs(&self) -> LegalConstructSet {
        constructs_for(self.last, self.braces.top())
    }

    pub fn last_checkpoint(&self) -> Option<Checkpoint> {
        self.last
    }

    pub fn brace_top(&self) -> Option<BraceKind> {
        self.braces.top()
    }

    pub fn target(&self) -> Option<SourcePosition> {
        self.target
    }

    pub fn grammar_name(&self) -> Option<&SymbolInfo> {
        self.grammar_name.as_ref()
    }

    pub fn charsets(&self) -> &[SymbolInfo] {
        &self.charsets
    }

    pub fn tokens(&self) -> &[SymbolInfo] {
        &self.tokens
    }

    pub fn productions(&self) -> &[SymbolInfo] {
        &self.productions
    }

    pub fn references(&self) -> &ReferenceIndex {
        &self.references
    }
}

impl ParseObserver for CompletionTracker {
    fn notify(&mut self, checkpoint: Checkpoint, state: &ParseState<'_>) {
        self.on_checkpoint(checkpoint, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructs::LegalConstruct;
    use coco_parser::coco::lexing::Token;
    use coco_parser::coco::parsing::Lookahead;

    fn state<'a>(name: &'a str, at: (usize, usize), current: (usize, usize)) -> ParseState<'a> {
        ParseState {
            lookahead: Some(Lookahead {
                token: Some(Token::Ident),
                text: name,
                position: SourcePosition::new(at.0, at.1),
            }),
            current: SourcePosition::new(current.0, current.1),
            error_count: 0,
            first_error: None,
        }
    }

    #[test]
    fn checkpoints_at_or_after_target_are_ignored() {
        let mut tracker = CompletionTracker::new();
        tracker.begin(Some(SourcePosition::new(1, 10)));
        tracker.on_checkpoint(Checkpoint::Start, &state("", (1, 1), (0, 0)));
        tracker.on_checkpoint(Checkpoint::BeforeCompiler, &state("", (1, 1), (0, 0)));
        tracker.on_checkpoint(Checkpoint::AfterGrammarName, &state("", (1, 15), (1, 10)));
        assert_eq!(tracker.last_checkpoint(), Some(Checkpoint::BeforeCompiler));
        assert!(tracker.legal_constructs().contains(LegalConstruct::Compiler));
    }

    #[test]
    fn declarations_set_the_context_of_later_references() {
        let mut tracker = CompletionTracker::new();
        tracker.begin(None);
        tracker.on_checkpoint(Checkpoint::ProductionName, &state("Expr", (4, 1), (3, 1)));
        tracker.on_checkpoint(Checkpoint::SymbolReference, &state("Term", (4, 8), (4, 6)));
        tracker.on_checkpoint(Checkpoint::SymbolReference, &state("Term", (4, 15), (4, 13)));

        assert_eq!(tracker.productions().len(), 1);
        let uses = &tracker.references()["Term"];
        assert_eq!(uses.len(), 2);
        assert!(uses.iter().all(|info| info.context() == Some("Expr")));
        assert_eq!(tracker.last_checkpoint(), None);
    }

    #[test]
    fn error_before_target_discards_the_answer() {
        let mut tracker = CompletionTracker::new();
        tracker.begin(Some(SourcePosition::new(5, 1)));
        tracker.on_checkpoint(Checkpoint::ProductionsKeyword, &state("A", (2, 1), (1, 1)));
        assert!(!tracker.legal_constructs().is_empty());

        let mut broken = state("B", (3, 1), (2, 5));
        broken.error_count = 1;
        broken.first_error = Some(SourcePosition::new(2, 5));
        tracker.on_checkpoint(Checkpoint::ProductionName, &broken);

        assert!(tracker.legal_constructs().is_empty());
        assert!(tracker.productions().is_empty());
    }

    #[test]
    fn error_after_target_keeps_the_answer() {
        let mut tracker = CompletionTracker::new();
        tracker.begin(Some(SourcePosition::new(2, 1)));
        tracker.on_checkpoint(Checkpoint::ProductionsKeyword, &state("", (3, 1), (1, 1)));

        let mut broken = state("", (3, 1), (3, 1));
        broken.error_count = 1;
        broken.first_error = Some(SourcePosition::new(3, 1));
        tracker.on_checkpoint(Checkpoint::ProductionName, &broken);

        assert_eq!(tracker.last_checkpoint(), Some(Checkpoint::ProductionsKeyword));
    }

    #[test]
    fn begin_resets_everything() {
        let mut tracker = CompletionTracker::new();
        tracker.begin(Some(SourcePosition::new(9, 9)));
        tracker.on_checkpoint(Checkpoint::CharSetName, &state("digit", (2, 3), (1, 1)));
        tracker.on_checkpoint(Checkpoint::TokenLBrace, &state("", (3, 3), (2, 9)));
        assert_eq!(tracker.brace_top(), Some(BraceKind::Brace));

        tracker.begin(None);
        assert!(tracker.charsets().is_empty());
        assert_eq!(tracker.brace_top(), None);
        assert_eq!(tracker.last_checkpoint(), None);
    }
}
