//! Main language server implementation

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use crate::features::completion::completion as compute_completion;
use crate::features::document_symbols::{collect_document_symbols, GrammarDocumentSymbol};
use crate::features::navigation::{definition as find_definition, references as find_uses};
use crate::features::semantic_tokens::{
    collect_semantic_tokens, CocoSemanticToken, SEMANTIC_TOKEN_KINDS,
};
use coco_analysis::completion::CompletionCandidate;
use coco_analysis::CompletionEngine;
use coco_config::CompletionConfig;
use coco_parser::coco::parsing::ParseDiagnostic;
use coco_parser::coco::source::{LineIndex, SourcePosition};
use coco_parser::coco::symbols::SymbolInfo;
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionOptions, CompletionParams, CompletionResponse, Diagnostic,
    DiagnosticSeverity, DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse,
    GotoDefinitionParams, GotoDefinitionResponse, InitializeParams, InitializeResult,
    InitializedParams, Location, OneOf, Position, ReferenceParams, SemanticToken,
    SemanticTokenType, SemanticTokens, SemanticTokensFullOptions, SemanticTokensLegend,
    SemanticTokensOptions, SemanticTokensParams, SemanticTokensResult, ServerCapabilities,
    ServerInfo, TextDocumentItem, TextDocumentSyncCapability, TextDocumentSyncKind, Url,
    WorkDoneProgressOptions,
};
use tower_lsp::Client;
use tracing::debug;

/// The part of the client the server talks back to.
#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>);
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }
}

/// Editor features over raw grammar text. Positions are 1-based byte positions.
pub trait FeatureProvider: Send + Sync + 'static {
    fn completion(&self, text: &str, position: SourcePosition, path: &str) -> Vec<CompletionCandidate>;
    fn document_symbols(&self, text: &str, path: &str) -> Vec<GrammarDocumentSymbol>;
    fn definition(&self, text: &str, position: SourcePosition, path: &str) -> Option<SymbolInfo>;
    fn references(
        &self,
        text: &str,
        position: SourcePosition,
        include_declaration: bool,
        path: &str,
    ) -> Vec<SymbolInfo>;
    fn semantic_tokens(&self, text: &str) -> Vec<CocoSemanticToken>;
    fn diagnostics(&self, text: &str, path: &str) -> Vec<ParseDiagnostic>;
}

pub struct DefaultFeatureProvider {
    engine: Arc<CompletionEngine>,
    config: CompletionConfig,
}

impl DefaultFeatureProvider {
    pub fn new(engine: Arc<CompletionEngine>, config: CompletionConfig) -> Self {
        Self { engine, config }
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn completion(&self, text: &str, position: SourcePosition, path: &str) -> Vec<CompletionCandidate> {
        compute_completion(&self.engine, &self.config, text, position, path)
    }

    fn document_symbols(&self, text: &str, path: &str) -> Vec<GrammarDocumentSymbol> {
        collect_document_symbols(&self.engine.request_symbols(text, path))
    }

    fn definition(&self, text: &str, position: SourcePosition, path: &str) -> Option<SymbolInfo> {
        find_definition(&self.engine, text, position, path)
    }

    fn references(
        &self,
        text: &str,
        position: SourcePosition,
        include_declaration: bool,
        path: &str,
    ) -> Vec<SymbolInfo> {
        find_uses(&self.engine, text, position, include_declaration, path)
    }

    fn semantic_tokens(&self, text: &str) -> Vec<CocoSemanticToken> {
        collect_semantic_tokens(text)
    }

    fn diagnostics(&self, text: &str, path: &str) -> Vec<ParseDiagnostic> {
        self.engine.request_symbols(text, path).diagnostics
    }
}

fn semantic_tokens_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: SEMANTIC_TOKEN_KINDS
            .iter()
            .map(|kind| SemanticTokenType::new(kind.as_str()))
            .collect(),
        token_modifiers: Vec::new(),
    }
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, Arc<String>>>,
}

impl DocumentStore {
    async fn upsert(&self, uri: Url, text: String) -> Arc<String> {
        let text = Arc::new(text);
        self.entries.write().await.insert(uri, text.clone());
        text
    }

    async fn get(&self, uri: &Url) -> Option<Arc<String>> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

pub struct CocoLanguageServer<C = Client, P = DefaultFeatureProvider> {
    client: C,
    documents: DocumentStore,
    features: Arc<P>,
}

impl CocoLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client, config: CompletionConfig) -> Self {
        let engine = Arc::new(CompletionEngine::new());
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new(engine, config)))
    }
}

impl<C, P> CocoLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>) -> Self {
        Self {
            client,
            documents: DocumentStore::default(),
            features,
        }
    }

    async fn text(&self, uri: &Url) -> Option<Arc<String>> {
        self.documents.get(uri).await
    }

    async fn store_and_publish(&self, uri: Url, text: String, version: i32) {
        let text = self.documents.upsert(uri.clone(), text).await;
        let lines = DocumentLines::new(&text);
        let diagnostics: Vec<Diagnostic> = self
            .features
            .diagnostics(&text, uri.path())
            .iter()
            .map(|diagnostic| to_lsp_diagnostic(&lines, diagnostic))
            .collect();
        debug!(%uri, count = diagnostics.len(), "publishing diagnostics");
        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }
}

/// Line table of one document snapshot, built once per request for position conversion.
struct DocumentLines<'a> {
    text: &'a str,
    index: LineIndex,
}

impl<'a> DocumentLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            index: LineIndex::new(text),
        }
    }

    /// Byte range of the zero-based `line` without its terminator.
    fn content_bounds(&self, line: usize) -> Option<Range<usize>> {
        let start = self.index.line_start(line)?;
        let end = self.index.line_start(line + 1).unwrap_or(self.text.len());
        let content = self.text[start..end].trim_end_matches(['\r', '\n']);
        Some(start..start + content.len())
    }

    /// Text of the zero-based `line` without its terminator; empty past the end.
    fn line_text(&self, line: usize) -> &'a str {
        self.content_bounds(line)
            .map_or("", |bounds| &self.text[bounds])
    }

    /// 1-based byte position to LSP position (0-based, UTF-16 columns).
    fn to_lsp(&self, position: SourcePosition) -> Position {
        let line = position.line.saturating_sub(1);
        let line_text = self.line_text(line);
        let mut byte_column = position.column.saturating_sub(1).min(line_text.len());
        while !line_text.is_char_boundary(byte_column) {
            byte_column -= 1;
        }
        let character = line_text[..byte_column].encode_utf16().count();
        Position::new(line as u32, character as u32)
    }

    /// LSP position to the 1-based byte position used by the analysis.
    fn to_source(&self, position: Position) -> SourcePosition {
        let line = position.line as usize;
        let line_text = self.line_text(line);
        let mut units = 0usize;
        let mut byte_column = line_text.len();
        for (offset, ch) in line_text.char_indices() {
            if units >= position.character as usize {
                byte_column = offset;
                break;
            }
            units += ch.len_utf16();
        }
        SourcePosition::new(line + 1, byte_column + 1)
    }

    fn range(&self, start: SourcePosition, end: SourcePosition) -> lsp_types::Range {
        lsp_types::Range {
            start: self.to_lsp(start),
            end: self.to_lsp(end),
        }
    }

    fn symbol_range(&self, info: &SymbolInfo) -> lsp_types::Range {
        self.range(info.position(), info.end_position())
    }

    /// Split a byte span into `(line, utf16 start, utf16 length)` pieces, one per line.
    fn line_segments(&self, span: &Range<usize>) -> Vec<(u32, u32, u32)> {
        let mut segments = Vec::new();
        let (mut line, _) = self.index.position_to_line(span.start);
        let mut start = span.start;
        while let Some(bounds) = self.content_bounds(line) {
            let end = span.end.min(bounds.end);
            if end > start {
                let column = self.text[bounds.start..start].encode_utf16().count();
                let length = self.text[start..end].encode_utf16().count();
                segments.push((line as u32, column as u32, length as u32));
            }
            match self.index.line_start(line + 1) {
                Some(next) if next < span.end => {
                    start = next;
                    line += 1;
                }
                _ => break,
            }
        }
        segments
    }
}

fn locations(uri: &Url, lines: &DocumentLines<'_>, infos: &[SymbolInfo]) -> Vec<Location> {
    infos
        .iter()
        .map(|info| Location::new(uri.clone(), lines.symbol_range(info)))
        .collect()
}

fn encode_semantic_tokens(tokens: &[CocoSemanticToken], lines: &DocumentLines<'_>) -> Vec<SemanticToken> {
    let mut data = Vec::new();
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for token in tokens {
        let token_type = SEMANTIC_TOKEN_KINDS
            .iter()
            .position(|kind| *kind == token.kind)
            .unwrap_or(0) as u32;
        for (line, start, length) in lines.line_segments(&token.span) {
            let delta_line = line - prev_line;
            let delta_start = if delta_line == 0 { start - prev_start } else { start };
            data.push(SemanticToken {
                delta_line,
                delta_start,
                length,
                token_type,
                token_modifiers_bitset: 0,
            });
            prev_line = line;
            prev_start = start;
        }
    }

    data
}

fn to_lsp_diagnostic(lines: &DocumentLines<'_>, diagnostic: &ParseDiagnostic) -> Diagnostic {
    let start = diagnostic.position();
    let end = SourcePosition::new(start.line, start.column + 1);
    Diagnostic {
        range: lines.range(start, end),
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some("coco".to_string()),
        message: diagnostic.message.clone(),
        ..Diagnostic::default()
    }
}

#[allow(deprecated)]
fn to_document_symbol(lines: &DocumentLines<'_>, symbol: &GrammarDocumentSymbol) -> DocumentSymbol {
    let range = lines.range(symbol.start, symbol.end);
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: symbol.detail.clone(),
        kind: symbol.kind,
        deprecated: None,
        range,
        selection_range: range,
        children: if symbol.children.is_empty() {
            None
        } else {
            Some(
                symbol
                    .children
                    .iter()
                    .map(|child| to_document_symbol(lines, child))
                    .collect(),
            )
        },
        tags: None,
    }
}

fn to_completion_item(candidate: CompletionCandidate) -> CompletionItem {
    CompletionItem {
        label: candidate.label,
        kind: Some(candidate.kind),
        detail: candidate.detail,
        insert_text: candidate.insert_text,
        ..CompletionItem::default()
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for CocoLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            completion_provider: Some(CompletionOptions::default()),
            document_symbol_provider: Some(OneOf::Left(true)),
            definition_provider: Some(OneOf::Left(true)),
            references_provider: Some(OneOf::Left(true)),
            semantic_tokens_provider: Some(
                lsp_types::SemanticTokensServerCapabilities::SemanticTokensOptions(
                    SemanticTokensOptions {
                        work_done_progress_options: WorkDoneProgressOptions::default(),
                        legend: semantic_tokens_legend(),
                        range: None,
                        full: Some(SemanticTokensFullOptions::Bool(true)),
                    },
                ),
            ),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "coco-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {}

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: lsp_types::DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;
        debug!(%uri, "opened");
        self.store_and_publish(uri, text, version).await;
    }

    async fn did_change(&self, params: lsp_types::DidChangeTextDocumentParams) {
        if let Some(change) = params.content_changes.into_iter().last() {
            let document = params.text_document;
            self.store_and_publish(document.uri, change.text, document.version)
                .await;
        }
    }

    async fn did_close(&self, params: lsp_types::DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri).await;
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let Some(text) = self.text(uri).await else {
            return Ok(None);
        };
        let lines = DocumentLines::new(&text);
        let position = lines.to_source(params.text_document_position.position);
        let items: Vec<CompletionItem> = self
            .features
            .completion(&text, position, uri.path())
            .into_iter()
            .map(to_completion_item)
            .collect();
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let Some(text) = self.text(&params.text_document.uri).await else {
            return Ok(None);
        };
        let tokens = self.features.semantic_tokens(&text);
        let data = encode_semantic_tokens(&tokens, &DocumentLines::new(&text));
        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data,
        })))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = &params.text_document.uri;
        if let Some(text) = self.text(uri).await {
            let lines = DocumentLines::new(&text);
            let symbols = self.features.document_symbols(&text, uri.path());
            let converted: Vec<DocumentSymbol> = symbols
                .iter()
                .map(|symbol| to_document_symbol(&lines, symbol))
                .collect();
            Ok(Some(DocumentSymbolResponse::Nested(converted)))
        } else {
            Ok(None)
        }
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let Some(text) = self.text(uri).await else {
            return Ok(None);
        };
        let lines = DocumentLines::new(&text);
        let position = lines.to_source(params.text_document_position_params.position);
        Ok(self
            .features
            .definition(&text, position, uri.path())
            .map(|info| {
                GotoDefinitionResponse::Scalar(Location::new(uri.clone(), lines.symbol_range(&info)))
            }))
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = &params.text_document_position.text_document.uri;
        let Some(text) = self.text(uri).await else {
            return Ok(None);
        };
        let lines = DocumentLines::new(&text);
        let position = lines.to_source(params.text_document_position.position);
        let found = self.features.references(
            &text,
            position,
            params.context.include_declaration,
            uri.path(),
        );
        Ok(Some(locations(uri, &lines, &found)))
    }
}
