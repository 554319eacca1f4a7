//! Positioned lexemes
//!
//! Wraps the logos token stream with byte spans and 1-based positions.

use super::token::Token;
use crate::coco::source::{LineIndex, SourcePosition};
use logos::Logos;
use std::ops::Range;

/// One lexeme of the grammar text.
///
/// `token` is `None` for text logos could not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Option<Token>,
    pub span: Range<usize>,
    pub position: SourcePosition,
}

impl Lexeme {
    pub fn is(&self, token: Token) -> bool {
        self.token == Some(token)
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

/// Tokenize `source` for the parser, dropping comments.
pub fn scan(source: &str, index: &LineIndex) -> Vec<Lexeme> {
    lex(source, index, false)
}

/// Tokenize `source` keeping comment lexemes, for highlighting.
pub fn scan_with_comments(source: &str, index: &LineIndex) -> Vec<Lexeme> {
    lex(source, index, true)
}

fn lex(source: &str, index: &LineIndex, keep_comments: bool) -> Vec<Lexeme> {
    let mut lexer = Token::lexer(source);
    let mut lexemes = Vec::new();
    while let Some(result) = lexer.next() {
        let token = match result {
            Ok(token) if token.is_comment() && !keep_comments => continue,
            Ok(token) => Some(token),
            Err(()) => None,
        };
        let span = lexer.span();
        lexemes.push(Lexeme {
            token,
            position: index.source_position(span.start),
            span,
        });
    }
    lexemes
}
