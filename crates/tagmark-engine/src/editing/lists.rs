//! List lines, groups and labels.
//!
//! A list line starts with [`SENTINEL`], covered by a one-char mark whose
//! class says which kind of list the line belongs to. Groups and labels are
//! derived from those marks on demand.

use crate::editing::{Document, ListKind, MarkClass, Origin, Position, Range, Stickiness, commands};
use crate::error::Result;

/// Render-only character at column 0 of every list line.
pub const SENTINEL: char = '\u{2642}';

/// Label shown for unordered items unless configured otherwise.
pub const DEFAULT_BULLET: &str = "\u{2022}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItem {
    pub line: usize,
    pub kind: ListKind,
}

/// Maximal run of consecutive list lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListGroup {
    pub items: Vec<ListItem>,
}

impl ListGroup {
    /// Container kind, decided by the first item.
    pub fn kind(&self) -> ListKind {
        self.items
            .first()
            .map_or(ListKind::Unordered, |item| item.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLabel {
    pub line: usize,
    pub label: String,
}

pub(crate) fn is_list_line(doc: &Document, line: usize) -> bool {
    doc.buffer.char_at(Position::new(line, 0)) == Some(SENTINEL)
}

pub(crate) fn list_kind_of_line(doc: &Document, line: usize) -> Option<ListKind> {
    let start = doc.buffer.line_start(line)?;
    if !is_list_line(doc, line) {
        return None;
    }
    doc.marks
        .iter()
        .filter(|m| m.range.start == start)
        .find_map(|m| m.class.list())
}

pub(crate) fn items(doc: &Document) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = doc
        .marks
        .iter()
        .filter_map(|m| {
            let kind = m.class.list()?;
            let pos = doc.buffer.position_of(m.range.start);
            (pos.ch == 0).then_some(ListItem {
                line: pos.line,
                kind,
            })
        })
        .collect();
    items.sort_by_key(|item| item.line);
    items.dedup_by_key(|item| item.line);
    items
}

pub(crate) fn groups(doc: &Document) -> Vec<ListGroup> {
    let mut groups: Vec<ListGroup> = Vec::new();
    let mut previous: Option<usize> = None;
    for item in items(doc) {
        match groups.last_mut() {
            Some(group) if previous == Some(item.line.wrapping_sub(1)) => group.items.push(item),
            _ => groups.push(ListGroup { items: vec![item] }),
        }
        previous = Some(item.line);
    }
    groups
}

/// Ordered items count up within a run of ordered items; unordered items
/// take the bullet and restart the count.
pub(crate) fn labels(groups: &[ListGroup], bullet: &str) -> Vec<ListLabel> {
    let mut labels = Vec::new();
    for group in groups {
        let mut number = 0;
        for item in &group.items {
            let label = match item.kind {
                ListKind::Ordered => {
                    number += 1;
                    format!("{number}.")
                }
                ListKind::Unordered => {
                    number = 0;
                    bullet.to_string()
                }
            };
            labels.push(ListLabel {
                line: item.line,
                label,
            });
        }
    }
    labels
}

pub(crate) fn renumber(doc: &mut Document) {
    let groups = groups(doc);
    doc.labels = labels(&groups, &doc.bullet);
}

pub(crate) fn insert_sentinel(doc: &mut Document, line: usize, kind: ListKind) -> Result<()> {
    let at = doc.buffer.offset_of(Position::new(line, 0))?;
    let mut buf = [0; 4];
    let compiled = commands::compile_bytes(&doc.buffer, at..at, SENTINEL.encode_utf8(&mut buf))?;
    doc.apply_compiled(compiled, Origin::Structural, Stickiness::PushRight)?;
    doc.marks
        .add(MarkClass::List(kind), at..at + SENTINEL.len_utf8(), false, false);
    Ok(())
}

pub(crate) fn remove_sentinel(doc: &mut Document, line: usize) -> Result<()> {
    let at = doc.buffer.offset_of(Position::new(line, 0))?;
    let compiled = commands::compile_bytes(&doc.buffer, at..at + SENTINEL.len_utf8(), "")?;
    doc.apply_compiled(compiled, Origin::Structural, Stickiness::Inclusivity)?;
    Ok(())
}

/// Delete sentinels that an edit left away from column 0, such as the one
/// of a list line joined onto the line above, and drop list marks that no
/// longer start a line. Returns how many sentinels were removed.
pub(crate) fn remove_stray_sentinels(doc: &mut Document) -> Result<usize> {
    let text = doc.buffer.text();
    let stray: Vec<usize> = text
        .match_indices(SENTINEL)
        .map(|(offset, _)| offset)
        .filter(|offset| doc.buffer.position_of(*offset).ch != 0)
        .collect();

    for at in stray.iter().rev() {
        let compiled = commands::compile_bytes(&doc.buffer, *at..*at + SENTINEL.len_utf8(), "")?;
        doc.apply_compiled(compiled, Origin::Structural, Stickiness::Inclusivity)?;
    }

    let misplaced: Vec<_> = doc
        .marks
        .iter()
        .filter(|m| m.class.list().is_some())
        .filter(|m| doc.buffer.position_of(m.range.start).ch != 0)
        .map(|m| m.id)
        .collect();
    for id in misplaced {
        doc.marks.remove(id);
    }
    Ok(stray.len())
}

/// Make every line of `range` a `kind` item, or unlist them all when they
/// already are list lines.
pub(crate) fn set_list(doc: &mut Document, kind: ListKind, range: Range) -> Result<()> {
    let lines = range.lines();
    if lines.clone().all(|line| is_list_line(doc, line)) {
        for line in lines {
            remove_sentinel(doc, line)?;
        }
    } else {
        for line in lines {
            if !is_list_line(doc, line) {
                insert_sentinel(doc, line, kind)?;
            }
        }
    }
    renumber(doc);
    Ok(())
}
