//! Recursive descent parser for the grammar language
//!
//! The parser does no semantic analysis. It checks syntax, reports errors Coco-style (at the
//! lookahead, at most one error per two consumed tokens) and announces checkpoints to its
//! observer. After an error inside a declaration it skips to the next `.` or section keyword.

use super::checkpoint::Checkpoint;
use super::diagnostic::{ParseDiagnostic, ParseOutcome};
use super::observer::{Lookahead, ParseObserver, ParseState};
use crate::coco::lexing::{scan, Lexeme, Token};
use crate::coco::source::{LineIndex, SourcePosition};
use tracing::{debug, trace};

/// Minimum number of tokens consumed between two reported errors
const MIN_ERROR_DISTANCE: usize = 2;

/// A syntax error that has already been recorded
#[derive(Debug)]
struct SyntaxError;

type ParseResult = Result<(), SyntaxError>;

/// Parses grammar text and drives a [`ParseObserver`].
///
/// The lexeme buffer is kept between parses.
#[derive(Debug, Default)]
pub struct GrammarParser {
    lexemes: Vec<Lexeme>,
}

impl GrammarParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, source: &str, observer: &mut dyn ParseObserver) -> ParseOutcome {
        let index = LineIndex::new(source);
        self.lexemes = scan(source, &index);
        let mut run = ParseRun {
            source,
            lexemes: &self.lexemes,
            pos: 0,
            current: SourcePosition::new(0, 0),
            end: index.source_position(source.len()),
            diagnostics: Vec::new(),
            err_dist: MIN_ERROR_DISTANCE,
            observer,
        };
        run.grammar();
        debug!(
            lexemes = self.lexemes.len(),
            errors = run.diagnostics.len(),
            "parsed grammar"
        );
        ParseOutcome {
            diagnostics: run.diagnostics,
        }
    }
}

/// Parse `source` once with a fresh parser.
pub fn parse_grammar(source: &str, observer: &mut dyn ParseObserver) -> ParseOutcome {
    GrammarParser::new().parse(source, observer)
}

struct ParseRun<'s, 'o> {
    source: &'s str,
    lexemes: &'s [Lexeme],
    /// Index of the lookahead lexeme
    pos: usize,
    current: SourcePosition,
    end: SourcePosition,
    diagnostics: Vec<ParseDiagnostic>,
    err_dist: usize,
    observer: &'o mut dyn ParseObserver,
}

impl<'s> ParseRun<'s, '_> {
    // ----- token access -----

    fn la(&self) -> Option<&'s Lexeme> {
        self.lexemes.get(self.pos)
    }

    /// `None` at end of input and for invalid lexemes.
    fn la_token(&self) -> Option<Token> {
        self.la().and_then(|lexeme| lexeme.token)
    }

    fn la_is(&self, token: Token) -> bool {
        self.la_token() == Some(token)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.lexemes.len()
    }

    fn la_position(&self) -> SourcePosition {
        self.la().map_or(self.end, |lexeme| lexeme.position)
    }

    /// Consume the lookahead without looking at what follows.
    fn advance(&mut self) {
        if let Some(lexeme) = self.la() {
            self.current = lexeme.position;
            self.pos += 1;
        }
        self.err_dist += 1;
    }

    /// Consume the lookahead and report invalid lexemes that follow it.
    fn get(&mut self) {
        self.advance();
        while matches!(self.la(), Some(lexeme) if lexeme.token.is_none()) {
            self.syn_err("invalid symbol");
            self.advance();
        }
    }

    fn expect(&mut self, token: Token) -> ParseResult {
        if self.la_is(token) {
            self.get();
            Ok(())
        } else {
            Err(self.syn_err(format!("{} expected", token.describe())))
        }
    }

    fn syn_err(&mut self, message: impl Into<String>) -> SyntaxError {
        if self.err_dist >= MIN_ERROR_DISTANCE {
            let diagnostic = ParseDiagnostic::new(self.la_position(), message);
            debug!(%diagnostic, "syntax error");
            self.diagnostics.push(diagnostic);
        }
        self.err_dist = 0;
        SyntaxError
    }

    /// Skip to just after the next `.`, or to the next section keyword.
    fn recover(&mut self) {
        while let Some(lexeme) = self.la() {
            match lexeme.token {
                Some(Token::Period) => {
                    self.get();
                    return;
                }
                Some(token) if token.is_section_keyword() => return,
                _ => self.advance(),
            }
        }
    }

    fn notify(&mut self, checkpoint: Checkpoint) {
        let lookahead = self.la().map(|lexeme| Lookahead {
            token: lexeme.token,
            text: lexeme.text(self.source),
            position: lexeme.position,
        });
        let state = ParseState {
            lookahead,
            current: self.current,
            error_count: self.diagnostics.len(),
            first_error: self.diagnostics.first().map(ParseDiagnostic::position),
        };
        trace!(%checkpoint, current = %self.current, "checkpoint");
        self.observer.notify(checkpoint, &state);
    }

    fn at_section_start(&self) -> bool {
        matches!(
            self.la_token(),
            Some(
                Token::IgnoreCase
                    | Token::Characters
                    | Token::Tokens
                    | Token::Pragmas
                    | Token::Comments
                    | Token::Ignore
                    | Token::Productions
            )
        )
    }

    fn la_starts_declaration_symbol(&self) -> bool {
        matches!(
            self.la_token(),
            Some(Token::Ident | Token::String | Token::Char | Token::BadString)
        )
    }

    fn la_starts_token_factor(&self) -> bool {
        self.la_starts_declaration_symbol()
            || matches!(
                self.la_token(),
                Some(Token::LPar | Token::LBrack | Token::LBrace)
            )
    }

    fn la_starts_factor(&self) -> bool {
        self.la_starts_token_factor()
            || matches!(
                self.la_token(),
                Some(Token::Weak | Token::LParPeriod | Token::Any | Token::Sync)
            )
    }

    // ----- grammar -----

    fn grammar(&mut self) {
        self.notify(Checkpoint::Start);
        // Anything before COMPILER is copied into the generated parser untouched
        while !self.at_end() && !self.la_is(Token::Compiler) {
            self.advance();
        }
        self.notify(Checkpoint::BeforeCompiler);
        if self.expect(Token::Compiler).is_err() {
            return;
        }

        self.notify(Checkpoint::GrammarName);
        let _ = self.expect(Token::Ident);
        self.notify(Checkpoint::AfterGrammarName);
        // Global code
        while !self.at_end() && !self.at_section_start() {
            self.advance();
        }

        if self.la_is(Token::IgnoreCase) {
            self.get();
            self.notify(Checkpoint::AfterIgnoreCase);
        }

        if self.la_is(Token::Characters) {
            self.get();
            self.notify(Checkpoint::CharactersSection);
            while self.la_is(Token::Ident) {
                if self.set_decl().is_err() {
                    self.recover();
                }
                self.notify(Checkpoint::CharactersSection);
            }
        }

        if self.la_is(Token::Tokens) {
            self.get();
            self.notify(Checkpoint::TokensSection);
            while self.la_starts_declaration_symbol() {
                if self.token_decl().is_err() {
                    self.recover();
                }
                self.notify(Checkpoint::TokensSection);
            }
        }

        if self.la_is(Token::Pragmas) {
            self.get();
            self.notify(Checkpoint::PragmasSection);
            while self.la_starts_declaration_symbol() {
                if self.token_decl().is_err() {
                    self.recover();
                }
                self.notify(Checkpoint::PragmasSection);
            }
        }

        while self.la_is(Token::Comments) {
            if self.comment_decl().is_err() {
                self.recover();
            }
        }

        while self.la_is(Token::Ignore) {
            self.get();
            self.notify(Checkpoint::SetOperand);
            if self.set().is_err() {
                self.recover();
            }
            self.notify(Checkpoint::IgnoreSet);
        }

        if !self.la_is(Token::Productions) {
            self.syn_err("\"PRODUCTIONS\" expected");
            while !self.at_end() && !self.la_is(Token::Productions) && !self.la_is(Token::End) {
                self.advance();
            }
        }
        if self.la_is(Token::Productions) {
            self.get();
            self.notify(Checkpoint::ProductionsKeyword);
            while self.la_is(Token::Ident) {
                if self.production().is_err() {
                    self.recover();
                }
            }
        }

        let _ = self.end_of_grammar();
    }

    fn set_decl(&mut self) -> ParseResult {
        self.notify(Checkpoint::CharSetName);
        self.get();
        self.notify(Checkpoint::CharSetAssign);
        self.expect(Token::Equal)?;
        self.notify(Checkpoint::SetOperand);
        self.set()?;
        self.expect(Token::Period)
    }

    fn set(&mut self) -> ParseResult {
        self.simple_set()?;
        while matches!(self.la_token(), Some(Token::Plus | Token::Minus)) {
            self.get();
            self.notify(Checkpoint::SetOperand);
            self.simple_set()?;
        }
        Ok(())
    }

    fn simple_set(&mut self) -> ParseResult {
        match self.la_token() {
            Some(Token::Ident) => {
                self.notify(Checkpoint::CharSetReference);
                self.get();
            }
            Some(Token::String | Token::Any) => self.get(),
            Some(Token::Char) => {
                self.get();
                if self.la_is(Token::DoublePeriod) {
                    self.get();
                    self.expect(Token::Char)?;
                }
            }
            Some(Token::BadString) => return Err(self.syn_err("string not terminated")),
            _ => return Err(self.syn_err("invalid SimSet")),
        }
        self.notify(Checkpoint::AfterSimpleSet);
        Ok(())
    }

    fn token_decl(&mut self) -> ParseResult {
        self.notify(Checkpoint::TokenName);
        match self.la_token() {
            Some(Token::Ident | Token::String | Token::Char) => self.get(),
            Some(Token::BadString) => return Err(self.syn_err("string not terminated")),
            _ => return Err(self.syn_err("ident expected")),
        }
        if self.la_is(Token::Equal) {
            self.get();
            self.notify(Checkpoint::TokenExpression);
            self.token_expr()?;
            self.expect(Token::Period)?;
        }
        if self.la_is(Token::LParPeriod) {
            self.semantic_text()?;
        }
        Ok(())
    }

    fn comment_decl(&mut self) -> ParseResult {
        self.get();
        self.notify(Checkpoint::CommentsKeyword);
        self.expect(Token::From)?;
        self.notify(Checkpoint::TokenExpression);
        self.token_expr()?;
        self.notify(Checkpoint::CommentsFrom);
        self.expect(Token::To)?;
        self.notify(Checkpoint::TokenExpression);
        self.token_expr()?;
        self.notify(Checkpoint::CommentsTo);
        if self.la_is(Token::Nested) {
            self.get();
            self.notify(Checkpoint::AfterNested);
        }
        Ok(())
    }

    fn token_expr(&mut self) -> ParseResult {
        self.token_term()?;
        while self.la_is(Token::Bar) {
            self.get();
            self.notify(Checkpoint::TokenExpression);
            self.token_term()?;
        }
        Ok(())
    }

    fn token_term(&mut self) -> ParseResult {
        self.token_factor()?;
        while self.la_starts_token_factor() {
            self.token_factor()?;
        }
        if self.la_is(Token::Context) {
            self.get();
            self.expect(Token::LPar)?;
            self.notify(Checkpoint::TokenLPar);
            self.token_expr()?;
            self.expect(Token::RPar)?;
            self.notify(Checkpoint::TokenRPar);
        }
        Ok(())
    }

    fn token_factor(&mut self) -> ParseResult {
        match self.la_token() {
            Some(Token::Ident) => {
                self.notify(Checkpoint::CharSetReference);
                self.get();
                self.notify(Checkpoint::TokenExpression);
            }
            Some(Token::String | Token::Char) => {
                self.get();
                self.notify(Checkpoint::TokenExpression);
            }
            Some(Token::LPar) => self.token_group(
                Token::RPar,
                Checkpoint::TokenLPar,
                Checkpoint::TokenRPar,
            )?,
            Some(Token::LBrack) => self.token_group(
                Token::RBrack,
                Checkpoint::TokenLBrack,
                Checkpoint::TokenRBrack,
            )?,
            Some(Token::LBrace) => self.token_group(
                Token::RBrace,
                Checkpoint::TokenLBrace,
                Checkpoint::TokenRBrace,
            )?,
            Some(Token::BadString) => return Err(self.syn_err("string not terminated")),
            _ => return Err(self.syn_err("invalid TokenFactor")),
        }
        Ok(())
    }

    fn token_group(&mut self, close: Token, opened: Checkpoint, closed: Checkpoint) -> ParseResult {
        self.get();
        self.notify(opened);
        self.token_expr()?;
        self.expect(close)?;
        self.notify(closed);
        Ok(())
    }

    fn production(&mut self) -> ParseResult {
        self.notify(Checkpoint::ProductionName);
        self.get();
        self.notify(Checkpoint::AfterProductionName);
        if matches!(self.la_token(), Some(Token::Lt | Token::LtPeriod)) {
            self.attributes()?;
            self.notify(Checkpoint::AfterAttributes);
        }
        if self.la_is(Token::LParPeriod) {
            self.semantic_text()?;
        }
        self.expect(Token::Equal)?;
        self.notify(Checkpoint::ExpressionStart);
        self.expression()?;
        self.expect(Token::Period)?;
        self.notify(Checkpoint::ProductionDone);
        Ok(())
    }

    fn expression(&mut self) -> ParseResult {
        self.term()?;
        while self.la_is(Token::Bar) {
            self.get();
            self.notify(Checkpoint::Alternative);
            self.term()?;
        }
        Ok(())
    }

    fn term(&mut self) -> ParseResult {
        if self.la_is(Token::If) {
            self.resolver()?;
        }
        while self.la_starts_factor() {
            self.factor()?;
        }
        Ok(())
    }

    fn resolver(&mut self) -> ParseResult {
        self.get();
        self.notify(Checkpoint::ResolverKeyword);
        self.expect(Token::LPar)?;
        self.notify(Checkpoint::ResolverCondition);
        self.condition()?;
        self.notify(Checkpoint::ExpressionStart);
        Ok(())
    }

    /// Host-language condition up to the matching `)`.
    fn condition(&mut self) -> ParseResult {
        let mut depth = 0usize;
        loop {
            match self.la().map(|lexeme| lexeme.token) {
                None => return Err(self.syn_err("\")\" expected")),
                Some(Some(Token::LPar)) => depth += 1,
                Some(Some(Token::RPar)) if depth == 0 => {
                    self.get();
                    return Ok(());
                }
                Some(Some(Token::RPar)) => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    fn factor(&mut self) -> ParseResult {
        match self.la_token() {
            Some(Token::Weak) => {
                self.get();
                self.notify(Checkpoint::AfterWeak);
                self.symbol()?;
            }
            Some(Token::Ident | Token::String | Token::Char | Token::BadString) => self.symbol()?,
            Some(Token::LPar) => self.group(
                Token::RPar,
                Checkpoint::ProductionLPar,
                Checkpoint::ProductionRPar,
            )?,
            Some(Token::LBrack) => self.group(
                Token::RBrack,
                Checkpoint::ProductionLBrack,
                Checkpoint::ProductionRBrack,
            )?,
            Some(Token::LBrace) => self.group(
                Token::RBrace,
                Checkpoint::ProductionLBrace,
                Checkpoint::ProductionRBrace,
            )?,
            Some(Token::LParPeriod) => {
                self.semantic_text()?;
                self.notify(Checkpoint::AfterFactor);
            }
            Some(Token::Any | Token::Sync) => {
                self.get();
                self.notify(Checkpoint::AfterFactor);
            }
            _ => return Err(self.syn_err("invalid Factor")),
        }
        Ok(())
    }

    /// A token or production use, with optional actual attributes.
    fn symbol(&mut self) -> ParseResult {
        match self.la_token() {
            Some(Token::Ident) => {
                self.notify(Checkpoint::SymbolReference);
                self.get();
            }
            Some(Token::String | Token::Char) => self.get(),
            Some(Token::BadString) => return Err(self.syn_err("string not terminated")),
            _ => return Err(self.syn_err("ident expected")),
        }
        self.notify(Checkpoint::AfterSymbol);
        if matches!(self.la_token(), Some(Token::Lt | Token::LtPeriod)) {
            self.attributes()?;
            self.notify(Checkpoint::AfterFactor);
        }
        Ok(())
    }

    fn group(&mut self, close: Token, opened: Checkpoint, closed: Checkpoint) -> ParseResult {
        self.get();
        self.notify(opened);
        self.expression()?;
        self.expect(close)?;
        self.notify(closed);
        Ok(())
    }

    /// `< ... >` with nesting, or raw `<. ... .>`.
    fn attributes(&mut self) -> ParseResult {
        let close = if self.la_is(Token::LtPeriod) {
            Token::PeriodGt
        } else {
            Token::Gt
        };
        let nested = close == Token::Gt;
        self.advance();
        self.notify(Checkpoint::SemanticText);
        let mut depth = 0usize;
        loop {
            match self.la().map(|lexeme| lexeme.token) {
                None => return Err(self.syn_err(format!("{} expected", close.describe()))),
                Some(Some(Token::BadString)) => {
                    return Err(self.syn_err("string not terminated in attributes"))
                }
                Some(Some(token)) if token == close && depth == 0 => {
                    self.get();
                    return Ok(());
                }
                Some(Some(Token::Lt)) if nested => depth += 1,
                Some(Some(Token::Gt)) if nested => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    /// `(. ... .)`, copied verbatim by the generator.
    fn semantic_text(&mut self) -> ParseResult {
        self.advance();
        self.notify(Checkpoint::SemanticText);
        loop {
            match self.la_token() {
                Some(Token::PeriodRPar) => {
                    self.get();
                    return Ok(());
                }
                Some(Token::BadString) => {
                    return Err(self.syn_err("string not terminated in semantic action"))
                }
                Some(Token::LParPeriod) => {
                    return Err(self.syn_err("missing end of previous semantic action"))
                }
                None if self.at_end() => return Err(self.syn_err("\".)\" expected")),
                _ => self.advance(),
            }
        }
    }

    fn end_of_grammar(&mut self) -> ParseResult {
        self.expect(Token::End)?;
        self.notify(Checkpoint::EndKeyword);
        self.notify(Checkpoint::EndName);
        self.expect(Token::Ident)?;
        self.notify(Checkpoint::AfterEndName);
        self.expect(Token::Period)?;
        self.notify(Checkpoint::EndOfGrammar);
        Ok(())
    }
}
