//! Properties of completion requests over arbitrary token soup

use coco_analysis::CompletionEngine;
use coco_parser::coco::source::SourcePosition;
use proptest::prelude::*;

fn grammar_soup() -> impl Strategy<Value = String> {
    let pieces = vec![
        "COMPILER", "G", "A", "CHARACTERS", "TOKENS", "PRODUCTIONS", "END", "=", ".", "|",
        "(", ")", "[", "]", "{", "}", "\"x\"", "'a'", "+", "ANY", "IF", "\n",
    ];
    prop::collection::vec(prop::sample::select(pieces), 0..40).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn error_before_cursor_empties_the_answer(source in grammar_soup(), line in 1usize..4, column in 1usize..40) {
        let engine = CompletionEngine::new();
        let snapshot = engine.request_completion(&source, line, column, "soup.atg");
        let target = SourcePosition::new(line, column);
        if let Some(first) = snapshot.diagnostics.first() {
            if first.position().is_before(&target) {
                prop_assert!(snapshot.legal_constructs.is_empty());
            }
        }
    }

    #[test]
    fn repeated_requests_agree(source in grammar_soup(), line in 1usize..4, column in 1usize..40) {
        let engine = CompletionEngine::new();
        let first = engine.request_completion(&source, line, column, "soup.atg");
        let _ = engine.request_symbols("COMPILER Other PRODUCTIONS Other = . END Other.", "other.atg");
        let second = engine.request_completion(&source, line, column, "soup.atg");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn symbol_requests_offer_nothing(source in grammar_soup()) {
        let engine = CompletionEngine::new();
        prop_assert!(engine.request_symbols(&source, "soup.atg").legal_constructs.is_empty());
    }
}
