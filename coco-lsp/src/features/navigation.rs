use coco_analysis::navigation::{find_declaration, find_references, word_at};
use coco_analysis::CompletionEngine;
use coco_parser::coco::source::SourcePosition;
use coco_parser::coco::symbols::SymbolInfo;

/// Declaration of the identifier under `position`.
pub fn definition(
    engine: &CompletionEngine,
    text: &str,
    position: SourcePosition,
    path: &str,
) -> Option<SymbolInfo> {
    let word = word_at(text, position.line, position.column)?;
    let snapshot = engine.request_symbols(text, path);
    find_declaration(&snapshot, word.name()).map(|(_, info)| info.clone())
}

/// Uses of the identifier under `position`.
pub fn references(
    engine: &CompletionEngine,
    text: &str,
    position: SourcePosition,
    include_declaration: bool,
    path: &str,
) -> Vec<SymbolInfo> {
    let Some(word) = word_at(text, position.line, position.column) else {
        return Vec::new();
    };
    let snapshot = engine.request_symbols(text, path);
    find_references(&snapshot, word.name(), include_declaration)
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::sample_source;

    #[test]
    fn definition_of_a_used_production() {
        let engine = CompletionEngine::new();
        // `Expr` used at the end of line 7
        let found = definition(&engine, sample_source(), SourcePosition::new(7, 30), "calc.atg").unwrap();
        assert_eq!(found.name(), "Expr");
        assert_eq!(found.position(), SourcePosition::new(8, 3));
    }

    #[test]
    fn references_of_a_token() {
        let engine = CompletionEngine::new();
        let found = references(&engine, sample_source(), SourcePosition::new(5, 4), true, "calc.atg");
        let lines: Vec<usize> = found.iter().map(SymbolInfo::line).collect();
        assert_eq!(lines, vec![5, 8, 8]);
    }

    #[test]
    fn nothing_under_whitespace() {
        let engine = CompletionEngine::new();
        assert!(definition(&engine, sample_source(), SourcePosition::new(7, 1), "calc.atg").is_none());
        assert!(references(&engine, sample_source(), SourcePosition::new(7, 1), false, "calc.atg").is_empty());
    }
}
