//! Syntactic checkpoints announced by the parser
//!
//! Each checkpoint has a stable integer id. Ids are never reused or renumbered; `-1` is
//! reserved for "no checkpoint" on the consumer side.

use serde::{Serialize, Serializer};
use std::fmt;

/// Kind of a bracketing pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BraceKind {
    Paren,
    Bracket,
    Brace,
}

/// Effect a checkpoint has on the open-brace stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceEvent {
    Open(BraceKind),
    Close(BraceKind),
}

/// Which declaration list a declaration checkpoint feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Grammar,
    CharSet,
    Token,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum Checkpoint {
    Start = 0,
    BeforeCompiler = 1,
    GrammarName = 2,
    AfterGrammarName = 3,
    AfterIgnoreCase = 4,
    CharSetName = 5,
    CharSetAssign = 6,
    AfterSimpleSet = 7,
    SetOperand = 8,
    CharactersSection = 9,
    TokenName = 10,
    TokenExpression = 11,
    TokenLPar = 12,
    TokenRPar = 13,
    TokenLBrack = 14,
    TokenRBrack = 15,
    TokenLBrace = 16,
    TokenRBrace = 17,
    TokensSection = 18,
    PragmasSection = 19,
    CommentsKeyword = 20,
    CommentsFrom = 21,
    CommentsTo = 22,
    IgnoreSet = 23,
    ProductionsKeyword = 24,
    ProductionName = 25,
    AfterProductionName = 26,
    ExpressionStart = 27,
    ResolverKeyword = 28,
    Alternative = 29,
    ProductionLPar = 30,
    ProductionLBrack = 31,
    ProductionLBrace = 32,
    ProductionRPar = 33,
    ProductionRBrack = 34,
    ProductionRBrace = 35,
    AfterFactor = 36,
    AfterWeak = 37,
    AfterSymbol = 38,
    ResolverCondition = 39,
    ProductionDone = 40,
    EndKeyword = 41,
    EndName = 42,
    AfterEndName = 43,
    AfterAttributes = 44,
    EndOfGrammar = 45,
    SemanticText = 46,
    CharSetReference = 47,
    SymbolReference = 48,
    AfterNested = 49,
}

impl Checkpoint {
    pub const ALL: [Checkpoint; 50] = [
        Checkpoint::Start,
        Checkpoint::BeforeCompiler,
        Checkpoint::GrammarName,
        Checkpoint::AfterGrammarName,
        Checkpoint::AfterIgnoreCase,
        Checkpoint::CharSetName,
        Checkpoint::CharSetAssign,
        Checkpoint::AfterSimpleSet,
        Checkpoint::SetOperand,
        Checkpoint::CharactersSection,
        Checkpoint::TokenName,
        Checkpoint::TokenExpression,
        Checkpoint::TokenLPar,
        Checkpoint::TokenRPar,
        Checkpoint::TokenLBrack,
        Checkpoint::TokenRBrack,
        Checkpoint::TokenLBrace,
        Checkpoint::TokenRBrace,
        Checkpoint::TokensSection,
        Checkpoint::PragmasSection,
        Checkpoint::CommentsKeyword,
        Checkpoint::CommentsFrom,
        Checkpoint::CommentsTo,
        Checkpoint::IgnoreSet,
        Checkpoint::ProductionsKeyword,
        Checkpoint::ProductionName,
        Checkpoint::AfterProductionName,
        Checkpoint::ExpressionStart,
        Checkpoint::ResolverKeyword,
        Checkpoint::Alternative,
        Checkpoint::ProductionLPar,
        Checkpoint::ProductionLBrack,
        Checkpoint::ProductionLBrace,
        Checkpoint::ProductionRPar,
        Checkpoint::ProductionRBrack,
        Checkpoint::ProductionRBrace,
        Checkpoint::AfterFactor,
        Checkpoint::AfterWeak,
        Checkpoint::AfterSymbol,
        Checkpoint::ResolverCondition,
        Checkpoint::ProductionDone,
        Checkpoint::EndKeyword,
        Checkpoint::EndName,
        Checkpoint::AfterEndName,
        Checkpoint::AfterAttributes,
        Checkpoint::EndOfGrammar,
        Checkpoint::SemanticText,
        Checkpoint::CharSetReference,
        Checkpoint::SymbolReference,
        Checkpoint::AfterNested,
    ];

    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Checkpoint> {
        usize::try_from(id)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Declaration checkpoints fire while the declared name is the lookahead.
    pub fn declaration(self) -> Option<DeclarationKind> {
        match self {
            Checkpoint::GrammarName => Some(DeclarationKind::Grammar),
            Checkpoint::CharSetName => Some(DeclarationKind::CharSet),
            Checkpoint::TokenName => Some(DeclarationKind::Token),
            Checkpoint::ProductionName => Some(DeclarationKind::Production),
            _ => None,
        }
    }

    /// Reference checkpoints fire while the referenced name is the lookahead.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            Checkpoint::CharSetReference | Checkpoint::SymbolReference | Checkpoint::EndName
        )
    }

    /// Token-context and production-context braces map onto the same kinds.
    pub fn brace_event(self) -> Option<BraceEvent> {
        use BraceEvent::{Close, Open};
        use BraceKind::{Brace, Bracket, Paren};
        match self {
            Checkpoint::TokenLPar | Checkpoint::ProductionLPar => Some(Open(Paren)),
            Checkpoint::TokenLBrack | Checkpoint::ProductionLBrack => Some(Open(Bracket)),
            Checkpoint::TokenLBrace | Checkpoint::ProductionLBrace => Some(Open(Brace)),
            Checkpoint::TokenRPar | Checkpoint::ProductionRPar => Some(Close(Paren)),
            Checkpoint::TokenRBrack | Checkpoint::ProductionRBrack => Some(Close(Bracket)),
            Checkpoint::TokenRBrace | Checkpoint::ProductionRBrace => Some(Close(Brace)),
            _ => None,
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.id())
    }
}

impl Serialize for Checkpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_stable() {
        for (index, checkpoint) in Checkpoint::ALL.iter().enumerate() {
            assert_eq!(checkpoint.id(), index as i32);
            assert_eq!(Checkpoint::from_id(index as i32), Some(*checkpoint));
        }
        assert_eq!(Checkpoint::from_id(-1), None);
        assert_eq!(Checkpoint::from_id(50), None);
    }

    #[test]
    fn braces_share_kinds_across_contexts() {
        assert_eq!(
            Checkpoint::TokenLBrace.brace_event(),
            Checkpoint::ProductionLBrace.brace_event()
        );
        assert_eq!(
            Checkpoint::ProductionRBrack.brace_event(),
            Some(BraceEvent::Close(BraceKind::Bracket))
        );
        assert_eq!(Checkpoint::AfterFactor.brace_event(), None);
    }

    #[test]
    fn declaration_and_reference_checkpoints() {
        let declarations: Vec<_> = Checkpoint::ALL
            .iter()
            .filter(|cp| cp.declaration().is_some())
            .map(|cp| cp.id())
            .collect();
        assert_eq!(declarations, vec![2, 5, 10, 25]);

        let references: Vec<_> = Checkpoint::ALL
            .iter()
            .filter(|cp| cp.is_reference())
            .map(|cp| cp.id())
            .collect();
        assert_eq!(references, vec![42, 47, 48]);
    }
}
