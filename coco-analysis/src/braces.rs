use coco_parser::coco::parsing::{BraceEvent, BraceKind};

/// Open groups before the cursor, innermost last.
///
/// Closing a brace that is not on top is ignored, so an unbalanced grammar still produces a
/// best-effort answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BraceStack {
    open: Vec<BraceKind>,
}

impl BraceStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: BraceKind) {
        self.open.push(kind);
    }

    /// Pop `kind` if it is on top; otherwise leave the stack alone.
    pub fn pop(&mut self, kind: BraceKind) -> bool {
        if self.open.last() == Some(&kind) {
            self.open.pop();
            true
        } else {
            false
        }
    }

    pub fn apply(&mut self, event: BraceEvent) {
        match event {
            BraceEvent::Open(kind) => self.push(kind),
            BraceEvent::Close(kind) => {
                self.pop(kind);
            }
        }
    }

    pub fn top(&self) -> Option<BraceKind> {
        self.open.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn clear(&mut self) {
        self.open.clear();
    }
}
