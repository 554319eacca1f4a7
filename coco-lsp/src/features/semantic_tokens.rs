use coco_parser::coco::lexing::{scan_with_comments, Lexeme, Token};
use coco_parser::coco::source::LineIndex;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CocoSemanticTokenKind {
    /// Grammar keywords, and C# keywords inside semantic text and attributes
    Keyword,
    String,
    Number,
    Comment,
    /// EBNF meta symbols and the delimiters of semantic text and attributes
    Operator,
}

impl CocoSemanticTokenKind {
    /// Standard LSP token type names so editor themes apply without configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            CocoSemanticTokenKind::Keyword => "keyword",
            CocoSemanticTokenKind::String => "string",
            CocoSemanticTokenKind::Number => "number",
            CocoSemanticTokenKind::Comment => "comment",
            CocoSemanticTokenKind::Operator => "operator",
        }
    }
}

pub const SEMANTIC_TOKEN_KINDS: &[CocoSemanticTokenKind] = &[
    CocoSemanticTokenKind::Keyword,
    CocoSemanticTokenKind::String,
    CocoSemanticTokenKind::Number,
    CocoSemanticTokenKind::Comment,
    CocoSemanticTokenKind::Operator,
];

/// A highlighted byte span of the grammar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CocoSemanticToken {
    pub kind: CocoSemanticTokenKind,
    pub span: Range<usize>,
}

/// Keywords of the host language (C#). Sorted for binary search.
const HOST_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

fn is_host_keyword(word: &str) -> bool {
    HOST_KEYWORDS.binary_search(&word).is_ok()
}

/// Where the scan currently is: grammar notation or embedded host code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Grammar,
    /// `(. ... .)`
    Action,
    /// `<. ... .>`
    DottedAttributes,
    /// `< ... >`; `depth` counts nested generic brackets
    Attributes { depth: usize },
}

pub fn collect_semantic_tokens(text: &str) -> Vec<CocoSemanticToken> {
    let index = LineIndex::new(text);
    let mut region = Region::Grammar;
    let mut tokens = Vec::new();
    for lexeme in scan_with_comments(text, &index) {
        let Some(token) = lexeme.token else {
            continue;
        };
        if let Some(kind) = classify(token, &lexeme, text, &mut region) {
            tokens.push(CocoSemanticToken {
                kind,
                span: lexeme.span,
            });
        }
    }
    tokens
}

fn classify(
    token: Token,
    lexeme: &Lexeme,
    text: &str,
    region: &mut Region,
) -> Option<CocoSemanticTokenKind> {
    use CocoSemanticTokenKind as Kind;

    if token.is_comment() {
        return Some(Kind::Comment);
    }
    match token {
        Token::String | Token::BadString | Token::Char => return Some(Kind::String),
        Token::Number => return Some(Kind::Number),
        _ => {}
    }

    match (*region, token) {
        (Region::Grammar, Token::LParPeriod) => {
            *region = Region::Action;
            Some(Kind::Operator)
        }
        (Region::Grammar, Token::LtPeriod) => {
            *region = Region::DottedAttributes;
            Some(Kind::Operator)
        }
        (Region::Grammar, Token::Lt) => {
            *region = Region::Attributes { depth: 0 };
            Some(Kind::Operator)
        }
        (Region::Grammar, Token::Ident | Token::Other) => None,
        (Region::Grammar, token) if token.is_keyword() => Some(Kind::Keyword),
        (Region::Grammar, _) => Some(Kind::Operator),

        (Region::Action, Token::PeriodRPar) | (Region::DottedAttributes, Token::PeriodGt) => {
            *region = Region::Grammar;
            Some(Kind::Operator)
        }
        (Region::Attributes { depth }, Token::Lt) => {
            *region = Region::Attributes { depth: depth + 1 };
            None
        }
        (Region::Attributes { depth: 0 }, Token::Gt) => {
            *region = Region::Grammar;
            Some(Kind::Operator)
        }
        (Region::Attributes { depth }, Token::Gt) => {
            *region = Region::Attributes { depth: depth - 1 };
            None
        }
        (_, Token::Ident) if is_host_keyword(lexeme.text(text)) => Some(Kind::Keyword),
        _ => None,
    }
}
