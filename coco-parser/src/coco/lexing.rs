//! Lexer
//!
//!     Grammar text is tokenized in one pass by the logos lexer in [token](token). The
//!     [scanner](scanner) then attaches 1-based line/column positions to every lexeme using a
//!     [`LineIndex`](crate::coco::source::LineIndex), so the parser can report the positions
//!     the completion tracker compares against the cursor.
//!
//!     Whitespace and `$` pragmas are skipped by the lexer. `//` line comments and nested
//!     `/* */` comments are lexed so highlighting can see them, but [`scan`] drops them before
//!     the parser. Anything logos cannot match (a stray character, an unterminated comment) becomes
//!     an invalid lexeme that the parser reports as a syntax error.

pub mod scanner;
pub mod token;

pub use scanner::{scan, scan_with_comments, Lexeme};
pub use token::Token;
