//! Go-to-declaration and find-references over a [`GrammarSnapshot`].

use crate::engine::GrammarSnapshot;
use coco_parser::coco::source::LineIndex;
use coco_parser::coco::symbols::SymbolInfo;
use lsp_types::SymbolKind;

pub use coco_parser::coco::parsing::DeclarationKind;

pub fn symbol_kind(kind: DeclarationKind) -> SymbolKind {
    match kind {
        DeclarationKind::Grammar => SymbolKind::MODULE,
        DeclarationKind::CharSet => SymbolKind::ENUM,
        DeclarationKind::Token => SymbolKind::CONSTANT,
        DeclarationKind::Production => SymbolKind::FUNCTION,
    }
}

pub fn kind_label(kind: DeclarationKind) -> &'static str {
    match kind {
        DeclarationKind::Grammar => "grammar",
        DeclarationKind::CharSet => "character set",
        DeclarationKind::Token => "token",
        DeclarationKind::Production => "production",
    }
}

/// Identifier covering the 1-based `line`/`column`, with its start position.
///
/// A cursor just past the last character of a name still selects it.
pub fn word_at(source: &str, line: usize, column: usize) -> Option<SymbolInfo> {
    if line == 0 || column == 0 {
        return None;
    }
    let index = LineIndex::new(source);
    let offset = index.line_to_offset(line - 1, column - 1)?;
    let line_start = index.line_start(line - 1)?;
    let bytes = source.as_bytes();

    let mut start = offset;
    while start > line_start && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = offset;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }
    if start == end || bytes[start].is_ascii_digit() {
        return None;
    }
    Some(SymbolInfo::new(&source[start..end], line, start - line_start + 1))
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Declaration of `name`: productions win over tokens, tokens over charsets, and the grammar
/// name is tried last.
pub fn find_declaration<'a>(
    snapshot: &'a GrammarSnapshot,
    name: &str,
) -> Option<(DeclarationKind, &'a SymbolInfo)> {
    let lists = [
        (DeclarationKind::Production, snapshot.productions.as_slice()),
        (DeclarationKind::Token, snapshot.tokens.as_slice()),
        (DeclarationKind::CharSet, snapshot.charsets.as_slice()),
        (DeclarationKind::Grammar, snapshot.grammar_name.as_slice()),
    ];
    lists.into_iter().find_map(|(kind, infos)| {
        infos
            .iter()
            .find(|info| info.name() == name)
            .map(|info| (kind, info))
    })
}

/// Every use of `name`, in source order, optionally preceded by its declaration.
pub fn find_references<'a>(
    snapshot: &'a GrammarSnapshot,
    name: &str,
    include_declaration: bool,
) -> Vec<&'a SymbolInfo> {
    let mut found = Vec::new();
    if include_declaration {
        if let Some((_, declaration)) = find_declaration(snapshot, name) {
            found.push(declaration);
        }
    }
    if let Some(uses) = snapshot.references.get(name) {
        found.extend(uses.iter());
    }
    found
}

/// All declarations in document order, tagged with their kind.
pub fn declarations(snapshot: &GrammarSnapshot) -> Vec<(DeclarationKind, &SymbolInfo)> {
    let mut all: Vec<(DeclarationKind, &SymbolInfo)> = snapshot
        .grammar_name
        .iter()
        .map(|info| (DeclarationKind::Grammar, info))
        .chain(snapshot.charsets.iter().map(|info| (DeclarationKind::CharSet, info)))
        .chain(snapshot.tokens.iter().map(|info| (DeclarationKind::Token, info)))
        .chain(snapshot.productions.iter().map(|info| (DeclarationKind::Production, info)))
        .collect();
    all.sort_by_key(|(_, info)| info.position());
    all
}
