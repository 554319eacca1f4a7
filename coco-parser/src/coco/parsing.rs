//! Parser
//!
//!     [`GrammarParser`] parses the grammar language by recursive descent over the positioned
//!     lexemes from [lexing](crate::coco::lexing). It builds no tree. Instead it announces
//!     [`Checkpoint`]s to a [`ParseObserver`] at fixed points of the grammar: before a declared
//!     or referenced name is consumed, after section keywords, after every factor, and after
//!     each opening and closing brace.
//!
//!     Together with the [`ParseState`] handed over at each checkpoint (lookahead, last
//!     consumed token, error count) this is enough for an observer to work out what may be
//!     typed at a cursor and where every symbol is declared and used.
//!
//!     Syntax errors become [`ParseDiagnostic`]s in the returned [`ParseOutcome`].

pub mod checkpoint;
pub mod diagnostic;
pub mod observer;
pub mod parser;

pub use checkpoint::{BraceEvent, BraceKind, Checkpoint, DeclarationKind};
pub use diagnostic::{ParseDiagnostic, ParseOutcome};
pub use observer::{Lookahead, NullObserver, ParseObserver, ParseState};
pub use parser::{parse_grammar, GrammarParser};
