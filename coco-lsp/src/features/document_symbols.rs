use coco_analysis::navigation::{declarations, kind_label, symbol_kind, DeclarationKind};
use coco_analysis::GrammarSnapshot;
use coco_parser::coco::source::SourcePosition;
use coco_parser::coco::symbols::SymbolInfo;
use lsp_types::SymbolKind;

/// Outline entry. Positions are 1-based byte positions; the server converts them.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarDocumentSymbol {
    pub name: String,
    pub detail: Option<String>,
    pub kind: SymbolKind,
    pub start: SourcePosition,
    pub end: SourcePosition,
    pub children: Vec<GrammarDocumentSymbol>,
}

impl GrammarDocumentSymbol {
    fn leaf(kind: DeclarationKind, info: &SymbolInfo) -> Self {
        Self {
            name: info.name().to_string(),
            detail: Some(kind_label(kind).to_string()),
            kind: symbol_kind(kind),
            start: info.position(),
            end: info.end_position(),
            children: Vec::new(),
        }
    }
}

/// The grammar as the root with every declaration below it. Without a grammar name (the
/// grammar does not get that far) the declarations are returned flat.
pub fn collect_document_symbols(snapshot: &GrammarSnapshot) -> Vec<GrammarDocumentSymbol> {
    let children: Vec<GrammarDocumentSymbol> = declarations(snapshot)
        .into_iter()
        .filter(|(kind, _)| *kind != DeclarationKind::Grammar)
        .map(|(kind, info)| GrammarDocumentSymbol::leaf(kind, info))
        .collect();

    match &snapshot.grammar_name {
        Some(grammar) => {
            let mut root = GrammarDocumentSymbol::leaf(DeclarationKind::Grammar, grammar);
            root.children = children;
            vec![root]
        }
        None => children,
    }
}
