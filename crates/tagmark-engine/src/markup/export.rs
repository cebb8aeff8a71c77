//! Buffer, marks and line classes to tagged markup.
//!
//! Every open/close tag becomes an insertion at a `(line, ch)` column.
//! Insertions for one line are sorted and spliced into the escaped line
//! text, then lines are joined with the line-break token. Inline tags that
//! cross are closed and reopened so the output stays well nested.

use crate::editing::{Document, SENTINEL};

pub const DEFAULT_LINE_BREAK: &str = "<br />";

/// Nesting layer of a tag, outermost first. A heading on a list line sits
/// inside its item so the container stays well nested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Layer {
    Container = 0,
    Item = 1,
    Block = 2,
    Inline = 3,
}

#[derive(Debug)]
struct Insertion {
    ch: usize,
    closing: bool,
    layer: Layer,
    /// Column the matching open tag sits at
    opened_at: usize,
    /// Creation order within the inline layer
    seq: u64,
    name: String,
}

impl Insertion {
    fn open(ch: usize, layer: Layer, seq: u64, name: &str) -> Self {
        Self {
            ch,
            closing: false,
            layer,
            opened_at: ch,
            seq,
            name: name.to_string(),
        }
    }

    fn close(ch: usize, opened_at: usize, layer: Layer, seq: u64, name: &str) -> Self {
        Self {
            ch,
            closing: true,
            layer,
            opened_at,
            seq,
            name: name.to_string(),
        }
    }

    /// Closings first. Openings go outermost first, closings innermost
    /// first, so equal spans nest.
    fn sort_key(&self) -> (usize, u8, u8, usize, u64) {
        if self.closing {
            (
                self.ch,
                0,
                3 - self.layer as u8,
                usize::MAX - self.opened_at,
                u64::MAX - self.seq,
            )
        } else {
            (self.ch, 1, self.layer as u8, 0, self.seq)
        }
    }

    fn render(&self, out: &mut String) {
        match (self.layer, self.closing) {
            (Layer::Container, false) => out.push_str(&format!("<{}>\n", self.name)),
            (Layer::Container, true) => out.push_str(&format!("\n</{}>", self.name)),
            (_, false) => out.push_str(&format!("<{}>", self.name)),
            (_, true) => out.push_str(&format!("</{}>", self.name)),
        }
    }
}

fn line_insertions(doc: &Document) -> Vec<Vec<Insertion>> {
    let buffer = &doc.buffer;
    let line_count = buffer.line_count();
    let mut insertions: Vec<Vec<Insertion>> = (0..line_count).map(|_| Vec::new()).collect();

    let item_tag = doc.tags.list_item_tag();
    for group in doc.list_groups() {
        let container = group.kind().container_tag();
        let last = group.items.len() - 1;
        for (index, item) in group.items.iter().enumerate() {
            let len = buffer.line_len(item.line);
            let line = &mut insertions[item.line];
            if index == 0 {
                line.push(Insertion::open(0, Layer::Container, 0, container));
            }
            line.push(Insertion::open(0, Layer::Item, 0, item_tag));
            line.push(Insertion::close(len, 0, Layer::Item, 0, item_tag));
            if index == last {
                line.push(Insertion::close(len, 0, Layer::Container, 0, container));
            }
        }
    }

    for mark in doc.marks.iter() {
        let Some(class) = mark.class.inline() else {
            continue;
        };
        if mark.anchor || mark.is_empty() {
            continue;
        }
        let tag = doc.tags.tag_for(class);
        let start = buffer.position_of(mark.range.start);
        let end = buffer.position_of(mark.range.end);
        for line in start.line..=end.line {
            let s = if line == start.line { start.ch } else { 0 };
            let e = if line == end.line {
                end.ch
            } else {
                buffer.line_len(line)
            };
            if s >= e {
                continue;
            }
            let seq = mark.id.0;
            insertions[line].push(Insertion::open(s, Layer::Inline, seq, tag));
            insertions[line].push(Insertion::close(e, s, Layer::Inline, seq, tag));
        }
    }

    for (line, class) in doc.blocks.iter() {
        if line >= line_count {
            continue;
        }
        let tag = class.tag();
        let len = buffer.line_len(line);
        insertions[line].push(Insertion::open(0, Layer::Block, 0, &tag));
        insertions[line].push(Insertion::close(len, 0, Layer::Block, 0, &tag));
    }

    insertions
}

pub(crate) fn to_html(doc: &Document, line_break: &str) -> String {
    let mut lines = Vec::with_capacity(doc.buffer.line_count());
    for (line, mut pending) in line_insertions(doc).into_iter().enumerate() {
        pending.sort_by_key(Insertion::sort_key);
        let chars: Vec<char> = doc.buffer.line(line).unwrap_or_default().chars().collect();
        let mut out = String::new();
        let mut col = 0;
        let mut open_inline: Vec<&Insertion> = Vec::new();

        for insertion in &pending {
            let at = insertion.ch.min(chars.len());
            if at > col {
                push_text(&mut out, &chars[col..at]);
                col = at;
            }
            if insertion.layer != Layer::Inline {
                insertion.render(&mut out);
            } else if !insertion.closing {
                insertion.render(&mut out);
                open_inline.push(insertion);
            } else if let Some(depth) = open_inline.iter().rposition(|o| o.seq == insertion.seq) {
                let reopened = open_inline.split_off(depth + 1);
                for inner in reopened.iter().rev() {
                    out.push_str(&format!("</{}>", inner.name));
                }
                open_inline.pop();
                insertion.render(&mut out);
                for inner in &reopened {
                    inner.render(&mut out);
                }
                open_inline.extend(reopened);
            }
        }
        push_text(&mut out, &chars[col..]);
        lines.push(out);
    }
    lines.join(line_break)
}

fn push_text(out: &mut String, chars: &[char]) {
    let text: String = chars.iter().filter(|c| **c != SENTINEL).collect();
    out.push_str(&html_escape::encode_text(&text));
}
