//! Inline style algebra: coverage test, line-splitting removal and toggle.
//!
//! All three work line by line. On each line a range selects the columns
//! `[s, e]`: `start.ch` on its first line (0 elsewhere) up to `end.ch` on its
//! last line (the line length elsewhere). A non-collapsed range skips lines
//! where it selects no columns, such as the line a whole-line selection ends
//! on, or an empty line inside the range.

use crate::editing::{Document, InlineClass, Mark, MarkClass, MarkId, Position, Range};
use crate::error::Result;

fn matches(mark: &Mark, class: Option<InlineClass>) -> bool {
    mark.class
        .inline()
        .is_some_and(|have| class.is_none_or(|want| want == have))
}

/// Byte offset of every column of `line`, including the line end.
fn column_offsets(doc: &Document, line: usize) -> Result<Vec<usize>> {
    let start = doc.buffer.offset_of(Position::new(line, 0))?;
    let text = doc.buffer.line(line).unwrap_or_default();
    Ok(text
        .char_indices()
        .map(|(i, _)| start + i)
        .chain(std::iter::once(start + text.len()))
        .collect())
}

/// Columns `range` selects on `line`, clipped to the line.
fn columns(range: &Range, line: usize, line_len: usize) -> (usize, usize) {
    let (s, e) = range.columns_on(line, line_len);
    (s.min(line_len), e.min(line_len))
}

fn selects_nothing(range: &Range, s: usize, e: usize) -> bool {
    s == e && !range.is_collapsed()
}

pub(crate) fn is_range_marked(
    doc: &Document,
    range: Range,
    class: Option<InlineClass>,
) -> Result<bool> {
    let mut checked = false;
    for line in range.lines() {
        let offsets = column_offsets(doc, line)?;
        let (s, e) = columns(&range, line, offsets.len() - 1);
        if selects_nothing(&range, s, e) {
            continue;
        }
        for offset in &offsets[s..=e] {
            if !doc.marks.at(*offset).any(|m| matches(m, class)) {
                return Ok(false);
            }
        }
        checked = true;
    }
    Ok(checked)
}

/// Replace marks of `class` spanning several lines and touching `range`'s
/// lines with one mark per line segment.
fn split_multiline(doc: &mut Document, range: &Range, class: Option<InlineClass>) -> Result<()> {
    let (first, last) = (range.start.line, range.end.line);
    let spanning: Vec<Mark> = doc
        .marks
        .iter()
        .filter(|m| matches(m, class))
        .filter(|m| {
            let start = doc.buffer.position_of(m.range.start).line;
            let end = doc.buffer.position_of(m.range.end).line;
            start != end && start <= last && end >= first
        })
        .cloned()
        .collect();

    for mark in spanning {
        doc.marks.remove(mark.id);
        let from = doc.buffer.position_of(mark.range.start);
        let to = doc.buffer.position_of(mark.range.end);
        for line in from.line..=to.line {
            let start = if line == from.line {
                mark.range.start
            } else {
                doc.buffer.offset_of(Position::new(line, 0))?
            };
            let end = if line == to.line {
                mark.range.end
            } else {
                doc.buffer.line_end(line).unwrap_or(start)
            };
            if start < end {
                doc.marks.add(
                    mark.class,
                    start..end,
                    mark.inclusive_left,
                    mark.inclusive_right,
                );
            }
        }
    }
    Ok(())
}

/// Piece of a mark that survives a removal, in columns.
struct Remainder {
    from: usize,
    to: usize,
    inclusive_left: bool,
    inclusive_right: bool,
}

pub(crate) fn remove(doc: &mut Document, class: Option<InlineClass>, range: Range) -> Result<()> {
    split_multiline(doc, &range, class)?;

    for line in range.lines() {
        let offsets = column_offsets(doc, line)?;
        let line_len = offsets.len() - 1;
        let (s, e) = columns(&range, line, line_len);
        if selects_nothing(&range, s, e) {
            continue;
        }
        let (line_start, line_end) = (offsets[0], offsets[line_len]);

        let on_line: Vec<Mark> = doc
            .marks
            .iter()
            .filter(|m| matches(m, class))
            .filter(|m| m.range.start >= line_start && m.range.end <= line_end)
            .cloned()
            .collect();

        for mark in on_line {
            let from = doc.buffer.position_of(mark.range.start).ch;
            let to = doc.buffer.position_of(mark.range.end).ch;
            if s > to || e < from {
                continue;
            }

            let head = Remainder {
                from,
                to: s,
                inclusive_left: false,
                inclusive_right: false,
            };
            let tail = Remainder {
                from: e,
                to,
                inclusive_left: mark.inclusive_left,
                inclusive_right: mark.inclusive_right,
            };
            let remainders = match (s <= from, e >= to) {
                (true, true) => vec![],
                (true, false) => vec![tail],
                (false, true) => vec![head],
                (false, false) => vec![head, tail],
            };

            let mut kept = false;
            for rest in remainders.into_iter().filter(|r| r.from < r.to) {
                if rest.from == from && rest.to == to {
                    if let Some(original) = doc.marks.get_mut(mark.id) {
                        original.inclusive_left = rest.inclusive_left;
                        original.inclusive_right = rest.inclusive_right;
                    }
                    kept = true;
                } else {
                    doc.marks.add(
                        mark.class,
                        offsets[rest.from]..offsets[rest.to],
                        rest.inclusive_left,
                        rest.inclusive_right,
                    );
                }
            }
            if !kept {
                doc.marks.remove(mark.id);
            }
        }
    }
    Ok(())
}

/// Returns the marks created; empty when the toggle removed the style.
pub(crate) fn toggle(doc: &mut Document, class: InlineClass, range: Range) -> Result<Vec<MarkId>> {
    if is_range_marked(doc, range, Some(class))? {
        remove(doc, Some(class), range)?;
        return Ok(Vec::new());
    }
    remove(doc, Some(class), range)?;

    let mark_class = MarkClass::Inline(class);
    if range.is_collapsed() {
        let at = doc.buffer.offset_of(range.start)?;
        return Ok(vec![doc.marks.add_anchor(mark_class, at)]);
    }

    let mut added = Vec::new();
    for line in range.lines() {
        let offsets = column_offsets(doc, line)?;
        let (s, e) = columns(&range, line, offsets.len() - 1);
        if !selects_nothing(&range, s, e) {
            added.push(doc.marks.add(mark_class, offsets[s]..offsets[e], false, true));
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc() -> Document {
        Document::from_text("Testing\nformatting")
    }

    fn spans(doc: &Document, class: InlineClass) -> Vec<(Position, Position)> {
        doc.mark_spans()
            .into_iter()
            .filter(|span| span.class == MarkClass::Inline(class))
            .map(|span| (span.range.start, span.range.end))
            .collect()
    }

    fn p(line: usize, ch: usize) -> Position {
        Position::new(line, ch)
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut doc = doc();
        let range = Range::new((0, 0), (0, 7));
        toggle(&mut doc, InlineClass::Bold, range).unwrap();
        assert_eq!(spans(&doc, InlineClass::Bold), vec![(p(0, 0), p(0, 7))]);
        toggle(&mut doc, InlineClass::Bold, range).unwrap();
        assert!(spans(&doc, InlineClass::Bold).is_empty());
    }

    #[test]
    fn test_multiline_toggle_creates_mark_per_line() {
        let mut doc = doc();
        let added = toggle(&mut doc, InlineClass::Italic, Range::new((0, 3), (1, 4))).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(
            spans(&doc, InlineClass::Italic),
            vec![(p(0, 3), p(0, 7)), (p(1, 0), p(1, 4))]
        );
    }

    #[test]
    fn test_remove_inside_leaves_two_remainders() {
        let mut doc = doc();
        toggle(&mut doc, InlineClass::Bold, Range::new((1, 0), (1, 10))).unwrap();
        remove(&mut doc, Some(InlineClass::Bold), Range::new((1, 3), (1, 5))).unwrap();
        assert_eq!(
            spans(&doc, InlineClass::Bold),
            vec![(p(1, 0), p(1, 3)), (p(1, 5), p(1, 10))]
        );
        assert!(!is_range_marked(&doc, Range::new((1, 3), (1, 5)), None).unwrap());
    }

    #[test]
    fn test_remove_splits_multiline_mark_first() {
        let mut doc = doc();
        let id = doc.marks.add(
            MarkClass::Inline(InlineClass::Bold),
            2..12,
            false,
            true,
        );
        remove(&mut doc, Some(InlineClass::Bold), Range::new((1, 0), (1, 4))).unwrap();
        assert!(doc.marks.get(id).is_none());
        assert_eq!(spans(&doc, InlineClass::Bold), vec![(p(0, 2), p(0, 7))]);
    }

    #[test]
    fn test_remove_keeps_other_classes() {
        let mut doc = doc();
        let range = Range::new((0, 0), (0, 7));
        toggle(&mut doc, InlineClass::Bold, range).unwrap();
        toggle(&mut doc, InlineClass::Underline, range).unwrap();
        remove(&mut doc, Some(InlineClass::Bold), range).unwrap();
        assert!(spans(&doc, InlineClass::Bold).is_empty());
        assert_eq!(spans(&doc, InlineClass::Underline).len(), 1);

        remove(&mut doc, None, range).unwrap();
        assert!(doc.mark_spans().is_empty());
    }

    #[test]
    fn test_collapsed_toggle_is_anchor() {
        let mut doc = doc();
        let added = toggle(&mut doc, InlineClass::Bold, Range::collapsed((0, 3))).unwrap();
        let mark = doc.marks.get(added[0]).unwrap();
        assert!(mark.anchor);
        assert!(is_range_marked(&doc, Range::collapsed((0, 3)), Some(InlineClass::Bold)).unwrap());

        // Toggling again at the same spot drops the pending style
        toggle(&mut doc, InlineClass::Bold, Range::collapsed((0, 3))).unwrap();
        assert!(doc.marks.is_empty());
    }

    #[test]
    fn test_collapsed_toggle_at_mark_end_stops_growth() {
        let mut doc = doc();
        let range = Range::new((0, 0), (0, 7));
        let id = toggle(&mut doc, InlineClass::Bold, range).unwrap()[0];
        toggle(&mut doc, InlineClass::Bold, Range::collapsed((0, 7))).unwrap();
        let mark = doc.marks.get(id).unwrap();
        assert_eq!(mark.range, 0..7);
        assert!(!mark.inclusive_right);
    }

    #[test]
    fn test_whole_line_selection_toggles_off() {
        let mut doc = doc();
        let range = Range::new((0, 0), (1, 0));
        assert_eq!(toggle(&mut doc, InlineClass::Bold, range).unwrap().len(), 1);
        assert!(is_range_marked(&doc, range, Some(InlineClass::Bold)).unwrap());

        assert!(toggle(&mut doc, InlineClass::Bold, range).unwrap().is_empty());
        assert!(doc.marks.is_empty());
    }

    #[test]
    fn test_empty_line_inside_range_is_skipped() {
        let mut doc = Document::from_text("ab\n\ncd");
        let range = Range::new((0, 0), (2, 2));
        toggle(&mut doc, InlineClass::Italic, range).unwrap();
        assert_eq!(
            spans(&doc, InlineClass::Italic),
            vec![(p(0, 0), p(0, 2)), (p(2, 0), p(2, 2))]
        );

        assert!(toggle(&mut doc, InlineClass::Italic, range).unwrap().is_empty());
        assert!(doc.marks.is_empty());
    }

    #[test]
    fn test_range_selecting_no_columns_is_not_marked() {
        let mut doc = doc();
        toggle(&mut doc, InlineClass::Bold, Range::new((0, 0), (0, 7))).unwrap();
        let gap = Range::new((0, 7), (1, 0));
        assert!(!is_range_marked(&doc, gap, Some(InlineClass::Bold)).unwrap());
        assert!(toggle(&mut doc, InlineClass::Bold, gap).unwrap().is_empty());
        assert_eq!(spans(&doc, InlineClass::Bold), vec![(p(0, 0), p(0, 7))]);
    }
}
