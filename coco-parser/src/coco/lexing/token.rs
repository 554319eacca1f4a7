//! Token definitions for the grammar language
//!
//! Keywords are case sensitive. String and char literals keep their quotes in the lexeme text.
use logos::{Lexer, Logos};

/// All tokens the grammar lexer can produce
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"\$[A-Za-z0-9]*")]
pub enum Token {
    // Section keywords
    #[token("COMPILER")]
    Compiler,
    #[token("IGNORECASE")]
    IgnoreCase,
    #[token("CHARACTERS")]
    Characters,
    #[token("TOKENS")]
    Tokens,
    #[token("PRAGMAS")]
    Pragmas,
    #[token("COMMENTS")]
    Comments,
    #[token("FROM")]
    From,
    #[token("TO")]
    To,
    #[token("NESTED")]
    Nested,
    #[token("IGNORE")]
    Ignore,
    #[token("PRODUCTIONS")]
    Productions,
    #[token("END")]
    End,

    // Expression keywords
    #[token("ANY")]
    Any,
    #[token("WEAK")]
    Weak,
    #[token("SYNC")]
    Sync,
    #[token("IF")]
    If,
    #[token("CONTEXT")]
    Context,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"[0-9]+")]
    Number,
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*""#)]
    String,
    /// A string literal cut off by the end of the line or file
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*"#)]
    BadString,
    #[regex(r"'([^'\\\r\n]|\\[^\r\n][^'\r\n]*)'")]
    Char,

    // Punctuation
    #[token("=")]
    Equal,
    #[token(".")]
    Period,
    #[token("..")]
    DoublePeriod,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("|")]
    Bar,
    #[token("(")]
    LPar,
    #[token(")")]
    RPar,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<.")]
    LtPeriod,
    #[token(".>")]
    PeriodGt,
    #[token("(.")]
    LParPeriod,
    #[token(".)")]
    PeriodRPar,
    #[token(",")]
    Comma,

    /// Nested block comment; the parser never sees it
    #[token("/*", block_comment)]
    BlockComment,
    #[regex(r"//[^\r\n]*")]
    LineComment,

    /// Any other single character (only meaningful inside semantic text)
    #[regex(r#"[^A-Za-z0-9_\s"'.()\[\]{}<>=+\-|$,/]"#)]
    #[token("/")]
    Other,
}

/// Consume a possibly nested `/* */` comment. Fails if the comment never closes.
fn block_comment(lex: &mut Lexer<Token>) -> bool {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                i += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lex.bump(i);
                    return true;
                }
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    false
}

impl Token {
    /// Keywords that start a top-level section, used as resynchronisation points.
    pub fn is_section_keyword(&self) -> bool {
        matches!(
            self,
            Token::Characters
                | Token::Tokens
                | Token::Pragmas
                | Token::Comments
                | Token::Ignore
                | Token::Productions
                | Token::End
        )
    }

    pub fn is_keyword(&self) -> bool {
        self.is_section_keyword()
            || matches!(
                self,
                Token::Compiler
                    | Token::IgnoreCase
                    | Token::From
                    | Token::To
                    | Token::Nested
                    | Token::Any
                    | Token::Weak
                    | Token::Sync
                    | Token::If
                    | Token::Context
            )
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Token::BlockComment | Token::LineComment)
    }

    /// Tokens that can start a symbol: a name or a literal.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Token::Ident | Token::String | Token::Char)
    }

    /// How the token is named in syntax error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Compiler => "\"COMPILER\"",
            Token::IgnoreCase => "\"IGNORECASE\"",
            Token::Characters => "\"CHARACTERS\"",
            Token::Tokens => "\"TOKENS\"",
            Token::Pragmas => "\"PRAGMAS\"",
            Token::Comments => "\"COMMENTS\"",
            Token::From => "\"FROM\"",
            Token::To => "\"TO\"",
            Token::Nested => "\"NESTED\"",
            Token::Ignore => "\"IGNORE\"",
            Token::Productions => "\"PRODUCTIONS\"",
            Token::End => "\"END\"",
            Token::Any => "\"ANY\"",
            Token::Weak => "\"WEAK\"",
            Token::Sync => "\"SYNC\"",
            Token::If => "\"IF\"",
            Token::Context => "\"CONTEXT\"",
            Token::Ident => "ident",
            Token::Number => "number",
            Token::String => "string",
            Token::BadString => "badString",
            Token::Char => "char",
            Token::Equal => "\"=\"",
            Token::Period => "\".\"",
            Token::DoublePeriod => "\"..\"",
            Token::Plus => "\"+\"",
            Token::Minus => "\"-\"",
            Token::Bar => "\"|\"",
            Token::LPar => "\"(\"",
            Token::RPar => "\")\"",
            Token::LBrack => "\"[\"",
            Token::RBrack => "\"]\"",
            Token::LBrace => "\"{\"",
            Token::RBrace => "\"}\"",
            Token::Lt => "\"<\"",
            Token::Gt => "\">\"",
            Token::LtPeriod => "\"<.\"",
            Token::PeriodGt => "\".>\"",
            Token::LParPeriod => "\"(.\"",
            Token::PeriodRPar => "\".)\"",
            Token::Comma => "\",\"",
            Token::BlockComment | Token::LineComment => "comment",
            Token::Other => "symbol",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Result<Token, ()>> {
        Token::lexer(source).collect()
    }

    #[test]
    fn keywords_win_over_identifiers() {
        assert_eq!(
            lex("COMPILER Compiler PRODUCTIONSX"),
            vec![Ok(Token::Compiler), Ok(Token::Ident), Ok(Token::Ident)]
        );
    }

    #[test]
    fn punctuation_prefers_longest_match() {
        assert_eq!(
            lex(". .. (. .) <. .> ( <"),
            vec![
                Ok(Token::Period),
                Ok(Token::DoublePeriod),
                Ok(Token::LParPeriod),
                Ok(Token::PeriodRPar),
                Ok(Token::LtPeriod),
                Ok(Token::PeriodGt),
                Ok(Token::LPar),
                Ok(Token::Lt),
            ]
        );
    }

    #[test]
    fn comments_are_lexed_and_pragmas_skipped() {
        assert_eq!(
            lex("A // line\n/* outer /* inner */ still */ B $CN C"),
            vec![
                Ok(Token::Ident),
                Ok(Token::LineComment),
                Ok(Token::BlockComment),
                Ok(Token::Ident),
                Ok(Token::Ident)
            ]
        );
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert_eq!(lex("A /* never closed"), vec![Ok(Token::Ident), Err(())]);
    }

    #[test]
    fn strings_and_chars() {
        assert_eq!(
            lex(r#""abc" "a\"b" 'x' '\n'"#),
            vec![
                Ok(Token::String),
                Ok(Token::String),
                Ok(Token::Char),
                Ok(Token::Char)
            ]
        );
    }

    #[test]
    fn unterminated_string_is_bad_string() {
        assert_eq!(
            lex("\"abc\nX"),
            vec![Ok(Token::BadString), Ok(Token::Ident)]
        );
    }
}
