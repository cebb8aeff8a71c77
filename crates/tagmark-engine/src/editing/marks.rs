//! Ranged annotations over the buffer.
//!
//! Marks live as byte ranges in the rope and are carried through every edit
//! by transforming both endpoints through the edit's delta, the same way
//! block anchors are kept stable. Which side of an insertion an endpoint
//! lands on is decided by the mark's inclusivity.

use xi_rope::delta::Transformer;
use xi_rope::{Delta, RopeInfo};

use crate::editing::MarkClass;

/// Identifier of a mark. Ids are allocated from a counter, so ordering ids
/// orders marks by creation.
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Debug)]
pub struct MarkId(pub u64);

/// A ranged annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mark {
    pub id: MarkId,
    pub class: MarkClass,
    /// Byte range in the rope
    pub range: std::ops::Range<usize>,
    /// Text inserted exactly at the start joins the mark
    pub inclusive_left: bool,
    /// Text inserted exactly at the end joins the mark
    pub inclusive_right: bool,
    /// Zero-width pending style waiting for the next insertion
    pub anchor: bool,
}

impl Mark {
    /// True when `offset` lies within the mark, both ends included.
    pub fn covers(&self, offset: usize) -> bool {
        self.range.start <= offset && offset <= self.range.end
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// How mark endpoints sitting exactly on an insertion point move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stickiness {
    /// Follow each mark's inclusivity flags.
    Inclusivity,
    /// Every mark starting at the insertion point moves past the inserted
    /// text. Used when a list sentinel is slid in front of a line.
    PushRight,
}

/// Owns all marks of a document, in creation order.
#[derive(Clone, Debug, Default)]
pub struct MarkStore {
    marks: Vec<Mark>,
    next_id: u64,
}

impl MarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        class: MarkClass,
        range: std::ops::Range<usize>,
        inclusive_left: bool,
        inclusive_right: bool,
    ) -> MarkId {
        self.push(Mark {
            id: MarkId(0),
            class,
            range,
            inclusive_left,
            inclusive_right,
            anchor: false,
        })
    }

    /// Add a zero-width pending-style mark at `at`.
    pub fn add_anchor(&mut self, class: MarkClass, at: usize) -> MarkId {
        self.push(Mark {
            id: MarkId(0),
            class,
            range: at..at,
            inclusive_left: true,
            inclusive_right: true,
            anchor: true,
        })
    }

    fn push(&mut self, mut mark: Mark) -> MarkId {
        let id = MarkId(self.next_id);
        self.next_id += 1;
        mark.id = id;
        self.marks.push(mark);
        id
    }

    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks
            .binary_search_by_key(&id, |m| m.id)
            .ok()
            .map(|index| &self.marks[index])
    }

    pub fn get_mut(&mut self, id: MarkId) -> Option<&mut Mark> {
        let index = self.marks.binary_search_by_key(&id, |m| m.id).ok()?;
        Some(&mut self.marks[index])
    }

    pub fn remove(&mut self, id: MarkId) -> Option<Mark> {
        let index = self.marks.binary_search_by_key(&id, |m| m.id).ok()?;
        Some(self.marks.remove(index))
    }

    /// All marks in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Marks covering `offset`.
    pub fn at(&self, offset: usize) -> impl Iterator<Item = &Mark> {
        self.marks.iter().filter(move |m| m.covers(offset))
    }

    /// Marks touching `range`, boundaries included.
    pub fn intersecting(&self, range: std::ops::Range<usize>) -> impl Iterator<Item = &Mark> {
        self.marks
            .iter()
            .filter(move |m| m.range.start <= range.end && m.range.end >= range.start)
    }

    /// Carry every mark through `delta`.
    ///
    /// Non-anchor marks that collapse to zero width are dropped and returned.
    /// An anchor that gains width becomes an ordinary mark.
    pub fn transform(&mut self, delta: &Delta<RopeInfo>, stickiness: Stickiness) -> Vec<Mark> {
        let mut transformer = Transformer::new(delta);

        for mark in &mut self.marks {
            let (start_after, end_after) = match stickiness {
                Stickiness::Inclusivity => (!mark.inclusive_left, mark.inclusive_right),
                Stickiness::PushRight => (true, mark.inclusive_right || mark.is_empty()),
            };
            let start = transformer.transform(mark.range.start, start_after);
            let end = transformer.transform(mark.range.end, end_after).max(start);
            mark.range = start..end;

            if mark.anchor && !mark.is_empty() {
                mark.anchor = false;
                mark.inclusive_left = false;
            }
        }

        let (kept, dropped): (Vec<Mark>, Vec<Mark>) = std::mem::take(&mut self.marks)
            .into_iter()
            .partition(|m| m.anchor || !m.is_empty());
        self.marks = kept;
        dropped
    }

    /// Drop anchor marks that are not at `offset`. Returns how many went.
    pub fn clear_anchors_except(&mut self, offset: usize) -> usize {
        let before = self.marks.len();
        self.marks
            .retain(|m| !m.anchor || m.range.start == offset);
        before - self.marks.len()
    }
}
