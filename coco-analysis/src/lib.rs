//! Editor analysis for Coco/R grammars
//!
//!     Everything here is protocol agnostic: the language server and the CLI translate the
//!     results into their own shapes.
//!
//!     Completion works in a single pass. A [`CompletionTracker`](tracker::CompletionTracker)
//!     listens to the checkpoints the grammar parser emits, remembers the last one before the
//!     cursor and the braces open at that point, and collects declared and referenced symbols on
//!     the way. [`legality::constructs_for`] turns that last checkpoint into the set of
//!     constructs the user may type next, and [`completion::completion_items`] expands the set
//!     into candidates.
//!
//!     Requests go through [`engine::CompletionEngine`], which reuses one parser and tracker and
//!     runs requests one at a time.
//!
//! Modules
//!
//!     - constructs, legality, braces, tracker: the completion core
//!     - engine: request entry point and result snapshots
//!     - completion, navigation: editor features over a snapshot
//!     - diagnostics, remap: compiler/generator output parsing and mapping generated-file
//!       positions back to the grammar

pub mod braces;
pub mod completion;
pub mod constructs;
pub mod diagnostics;
pub mod engine;
pub mod legality;
pub mod navigation;
pub mod remap;
pub mod tracker;

pub use constructs::{LegalConstruct, LegalConstructSet};
pub use engine::{CompletionEngine, GrammarSession, GrammarSnapshot};
