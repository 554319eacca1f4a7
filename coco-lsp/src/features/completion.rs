use coco_analysis::completion::{completion_items, CompletionCandidate};
use coco_analysis::CompletionEngine;
use coco_config::CompletionConfig;
use coco_parser::coco::source::SourcePosition;

/// Candidates at a 1-based byte position.
pub fn completion(
    engine: &CompletionEngine,
    config: &CompletionConfig,
    text: &str,
    position: SourcePosition,
    path: &str,
) -> Vec<CompletionCandidate> {
    let snapshot = engine.request_completion(text, position.line, position.column, path);
    completion_items(&snapshot, config)
}
