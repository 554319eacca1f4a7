//! Notification protocol between the parser and its consumers

use super::checkpoint::Checkpoint;
use crate::coco::lexing::Token;
use crate::coco::source::SourcePosition;

/// The lookahead token at a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookahead<'a> {
    /// `None` for text the lexer could not match
    pub token: Option<Token>,
    pub text: &'a str,
    pub position: SourcePosition,
}

/// Parser state visible to observers at each checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseState<'a> {
    /// `None` at end of input
    pub lookahead: Option<Lookahead<'a>>,
    /// Position of the most recently consumed token; `0:0` before the first one.
    pub current: SourcePosition,
    pub error_count: usize,
    pub first_error: Option<SourcePosition>,
}

impl<'a> ParseState<'a> {
    /// Text of the lookahead when it can name a symbol, otherwise empty.
    pub fn lookahead_name(&self) -> &'a str {
        match self.lookahead {
            Some(la) if la.token.is_some_and(|token| token.is_symbol()) => la.text,
            _ => "",
        }
    }

    pub fn lookahead_position(&self) -> Option<SourcePosition> {
        self.lookahead.map(|la| la.position)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Receives checkpoint notifications in parse order.
pub trait ParseObserver {
    fn notify(&mut self, checkpoint: Checkpoint, state: &ParseState<'_>);
}

/// Observer that ignores everything, for callers that only want diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ParseObserver for NullObserver {
    fn notify(&mut self, _checkpoint: Checkpoint, _state: &ParseState<'_>) {}
}

impl<F> ParseObserver for F
where
    F: FnMut(Checkpoint, &ParseState<'_>),
{
    fn notify(&mut self, checkpoint: Checkpoint, state: &ParseState<'_>) {
        self(checkpoint, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(token: Option<Token>, text: &str) -> ParseState<'_> {
        ParseState {
            lookahead: Some(Lookahead {
                token,
                text,
                position: SourcePosition::new(1, 1),
            }),
            current: SourcePosition::new(0, 0),
            error_count: 0,
            first_error: None,
        }
    }

    #[test]
    fn lookahead_name_only_for_symbols() {
        assert_eq!(state(Some(Token::Ident), "expr").lookahead_name(), "expr");
        assert_eq!(state(Some(Token::String), "\"+\"").lookahead_name(), "\"+\"");
        assert_eq!(state(Some(Token::Characters), "CHARACTERS").lookahead_name(), "");
        assert_eq!(state(None, "?").lookahead_name(), "");
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        let mut observer = |cp: Checkpoint, _: &ParseState<'_>| seen.push(cp.id());
        observer.notify(Checkpoint::Start, &state(None, ""));
        observer.notify(Checkpoint::ProductionName, &state(None, ""));
        assert_eq!(seen, vec![0, 25]);
    }
}
