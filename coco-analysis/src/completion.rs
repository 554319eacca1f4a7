use crate::constructs::LegalConstruct;
use crate::engine::GrammarSnapshot;
use coco_config::CompletionConfig;
use coco_parser::coco::symbols::SymbolInfo;
use lsp_types::CompletionItemKind;

/// Describes a semantic completion candidate that can be translated into protocol specific items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub detail: Option<String>,
    pub kind: CompletionItemKind,
    pub insert_text: Option<String>,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            detail: None,
            kind,
            insert_text: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }
}

/// Turn the legal constructs of a completion snapshot into candidates.
///
/// Keywords and punctuation become keyword candidates. Placeholders expand to the names the
/// grammar declares; a new production name is suggested from identifiers that are used but
/// never declared. The result is sorted by label with duplicates removed.
pub fn completion_items(snapshot: &GrammarSnapshot, config: &CompletionConfig) -> Vec<CompletionCandidate> {
    let mut items = Vec::new();

    for construct in snapshot.legal_constructs.iter() {
        match construct {
            LegalConstruct::ExistingCharSet => {
                items.extend(symbols(&snapshot.charsets, CompletionItemKind::CONSTANT, "character set"))
            }
            LegalConstruct::ExistingToken => {
                items.extend(symbols(&snapshot.tokens, CompletionItemKind::CONSTANT, "token"))
            }
            LegalConstruct::ExistingProduction => items.extend(symbols(
                &snapshot.productions,
                CompletionItemKind::FUNCTION,
                "production",
            )),
            LegalConstruct::GrammarName => items.extend(symbols(
                snapshot.grammar_name.as_slice(),
                CompletionItemKind::MODULE,
                "grammar",
            )),
            LegalConstruct::ProductionName => {
                if config.suggest_undeclared_productions {
                    items.extend(snapshot.undeclared_references().map(|name| {
                        CompletionCandidate::new(name, CompletionItemKind::FUNCTION)
                            .with_detail("undeclared production")
                    }));
                }
            }
            keyword => {
                if !config.include_keywords {
                    continue;
                }
                let Some(text) = keyword.keyword() else {
                    continue;
                };
                let mut candidate =
                    CompletionCandidate::new(text, CompletionItemKind::KEYWORD).with_insert_text(text);
                if config.include_descriptions {
                    candidate = candidate.with_detail(keyword.description());
                }
                items.push(candidate);
            }
        }
    }

    items.sort_by(|a, b| a.label.cmp(&b.label));
    items.dedup_by(|a, b| a.label == b.label);
    items
}

fn symbols<'a>(
    infos: &'a [SymbolInfo],
    kind: CompletionItemKind,
    detail: &'static str,
) -> impl Iterator<Item = CompletionCandidate> + 'a {
    infos
        .iter()
        .map(move |info| CompletionCandidate::new(info.name(), kind).with_detail(detail))
}
