//! Checkpoint to legal construct table

use crate::constructs::{LegalConstruct, LegalConstructSet};
use coco_parser::coco::parsing::{BraceKind, Checkpoint};

use LegalConstruct::*;

const SECTIONS_AFTER_TOKENS: [LegalConstruct; 4] = [Pragmas, Comments, Ignore, Productions];

const TOKEN_EXPRESSION: [LegalConstruct; 6] = [ExistingCharSet, LPar, LBrack, LBrace, Context, Alternative];

const EXPRESSION_START: [LegalConstruct; 10] = [
    ExistingToken,
    ExistingProduction,
    Weak,
    LPar,
    LBrack,
    LBrace,
    Any,
    Sync,
    SemanticActionStart,
    If,
];

const AFTER_FACTOR: [LegalConstruct; 10] = [
    ExistingToken,
    ExistingProduction,
    Weak,
    LPar,
    LBrack,
    LBrace,
    Any,
    Sync,
    SemanticActionStart,
    Alternative,
];

/// Constructs legal after `checkpoint`, given the innermost open brace.
///
/// `None` (no checkpoint yet, or an error before the cursor) yields the empty set, as do
/// checkpoints where only free text or a fresh name can follow.
pub fn constructs_for(checkpoint: Option<Checkpoint>, brace_top: Option<BraceKind>) -> LegalConstructSet {
    let Some(checkpoint) = checkpoint else {
        return LegalConstructSet::empty();
    };
    let mut set: LegalConstructSet = base_constructs(checkpoint);
    if inside_expression(checkpoint) {
        if let Some(closer) = brace_top.map(closing_construct) {
            set.insert(closer);
        }
    }
    set
}

fn base_constructs(checkpoint: Checkpoint) -> LegalConstructSet {
    use Checkpoint as C;
    match checkpoint {
        C::Start | C::BeforeCompiler => [Compiler].into(),
        C::AfterGrammarName => {
            [IgnoreCase, Characters, Tokens, Pragmas, Comments, Ignore, Productions].into()
        }
        C::AfterIgnoreCase => [Characters, Tokens, Pragmas, Comments, Ignore, Productions].into(),
        C::AfterSimpleSet => [Plus, Minus, TokenRange].into(),
        C::SetOperand => [ExistingCharSet, Any].into(),
        C::CharactersSection => [Tokens, Pragmas, Comments, Ignore, Productions].into(),
        C::TokenExpression
        | C::TokenLPar
        | C::TokenRPar
        | C::TokenLBrack
        | C::TokenRBrack
        | C::TokenLBrace
        | C::TokenRBrace => TOKEN_EXPRESSION.into(),
        C::TokensSection => SECTIONS_AFTER_TOKENS.into(),
        C::PragmasSection => [Comments, Ignore, Productions].into(),
        C::CommentsKeyword => [CommentsFrom].into(),
        C::CommentsFrom => [CommentsTo].into(),
        C::CommentsTo => [CommentsNested, Comments, Ignore, Productions].into(),
        C::AfterNested => [Comments, Ignore, Productions].into(),
        C::IgnoreSet => [Ignore, Productions].into(),
        C::ProductionsKeyword | C::ProductionName => [ProductionName].into(),
        C::AfterProductionName => [AttributeStart, AttributeStartAlt, SemanticActionStart].into(),
        C::ExpressionStart
        | C::Alternative
        | C::ProductionLPar
        | C::ProductionLBrack
        | C::ProductionLBrace => EXPRESSION_START.into(),
        C::ResolverKeyword => [LPar].into(),
        C::ProductionRPar | C::ProductionRBrack | C::ProductionRBrace | C::AfterFactor => {
            AFTER_FACTOR.into()
        }
        C::AfterWeak => [ExistingToken].into(),
        C::AfterSymbol => {
            LegalConstructSet::from(AFTER_FACTOR) | [AttributeStart, AttributeStartAlt].into()
        }
        C::ProductionDone => [ProductionName, End].into(),
        C::EndKeyword | C::EndName => [GrammarName].into(),
        C::AfterEndName => [Period].into(),
        C::AfterAttributes => [SemanticActionStart].into(),
        C::CharSetReference => [ExistingCharSet].into(),
        C::SymbolReference => [ExistingToken, ExistingProduction].into(),
        C::GrammarName
        | C::CharSetName
        | C::CharSetAssign
        | C::TokenName
        | C::ResolverCondition
        | C::EndOfGrammar
        | C::SemanticText => LegalConstructSet::empty(),
    }
}

/// Checkpoints inside token expressions and production bodies, where a group may be closed.
fn inside_expression(checkpoint: Checkpoint) -> bool {
    use Checkpoint as C;
    matches!(
        checkpoint,
        C::TokenExpression
            | C::TokenLPar
            | C::TokenRPar
            | C::TokenLBrack
            | C::TokenRBrack
            | C::TokenLBrace
            | C::TokenRBrace
            | C::ExpressionStart
            | C::Alternative
            | C::ProductionLPar
            | C::ProductionLBrack
            | C::ProductionLBrace
            | C::ProductionRPar
            | C::ProductionRBrack
            | C::ProductionRBrace
            | C::AfterFactor
            | C::AfterSymbol
    )
}

fn closing_construct(kind: BraceKind) -> LegalConstruct {
    match kind {
        BraceKind::Paren => RPar,
        BraceKind::Bracket => RBrack,
        BraceKind::Brace => RBrace,
    }
}
