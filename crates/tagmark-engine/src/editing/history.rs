use xi_rope::delta::Transformer;
use xi_rope::{Delta, RopeInfo};

/// Replacement that undoes one edit: put `text` back over `range`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Revert {
    pub range: std::ops::Range<usize>,
    pub text: String,
}

/// Undo and redo stacks of text reverts.
///
/// Only buffer text is reverted; marks follow the reverted text through
/// their usual transformation.
#[derive(Debug, Clone, Default)]
pub(crate) struct History {
    done: Vec<Revert>,
    undone: Vec<Revert>,
}

impl History {
    /// Record a fresh user edit. Clears the redo stack.
    pub fn record(&mut self, revert: Revert) {
        self.done.push(revert);
        self.undone.clear();
    }

    pub fn pop_undo(&mut self) -> Option<Revert> {
        self.done.pop()
    }

    pub fn pop_redo(&mut self) -> Option<Revert> {
        self.undone.pop()
    }

    /// Keep the inverse of an undo so it can be redone.
    pub fn push_redo(&mut self, revert: Revert) {
        self.undone.push(revert);
    }

    /// Keep the inverse of a redo without touching the redo stack.
    pub fn push_undo(&mut self, revert: Revert) {
        self.done.push(revert);
    }

    /// Rebase stored ranges over an edit that is not itself recorded.
    pub fn transform(&mut self, delta: &Delta<RopeInfo>) {
        let mut transformer = Transformer::new(delta);
        for revert in self.done.iter_mut().chain(self.undone.iter_mut()) {
            let start = transformer.transform(revert.range.start, false);
            let end = transformer.transform(revert.range.end, true).max(start);
            revert.range = start..end;
        }
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }
}
