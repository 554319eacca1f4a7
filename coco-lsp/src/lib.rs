//! Language Server Protocol implementation for Coco/R grammars
//!
//!     The server is built on tower-lsp and keeps the text of every open grammar. All analysis
//!     happens per request in coco-analysis: one shared
//!     [`CompletionEngine`](coco_analysis::CompletionEngine) parses the current text with the
//!     cursor as its target and answers from the result.
//!
//! Features
//!
//!     - textDocument/completion: keywords legal at the cursor and declared names
//!     - textDocument/documentSymbol: the grammar with its character sets, tokens and
//!       productions
//!     - textDocument/definition and textDocument/references for identifiers
//!     - textDocument/semanticTokens/full: grammar keywords, C# keywords inside semantic text
//!       and attributes, literals, comments and meta symbols
//!     - textDocument/publishDiagnostics: syntax errors, sent after every open and change and
//!       cleared on close
//!
//!     Documents are synchronised in full on every change.
//!
//! Architecture
//!
//!     Server layer ([`server`]):
//!         - Stores document text
//!         - Converts between LSP positions (zero-based, UTF-16 columns) and the 1-based byte
//!           positions used by the analysis
//!         - Delegates to a [`FeatureProvider`](server::FeatureProvider) so tests can observe
//!           what is called
//!
//!     Feature layer ([`features`]):
//!         - Protocol independent, works on grammar text and analysis snapshots

pub mod features;
pub mod server;

pub use server::CocoLanguageServer;
