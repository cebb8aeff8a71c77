use std::borrow::Cow;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Position;
use crate::error::{EditorError, Result};

/// Line-oriented text buffer over an `xi_rope::Rope`.
///
/// Lines are separated by `\n` only; a trailing newline produces a final
/// empty line, so `"a\n"` has two lines. Columns count chars.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from(normalize_newlines(text)),
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    pub fn line_count(&self) -> usize {
        self.rope.line_of_offset(self.rope.len()) + 1
    }

    /// Byte offset of the first char of `line`.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        (line < self.line_count()).then(|| self.rope.offset_of_line(line))
    }

    /// Byte offset just past the last char of `line`, before its newline.
    pub fn line_end(&self, line: usize) -> Option<usize> {
        let count = self.line_count();
        if line >= count {
            return None;
        }
        if line + 1 == count {
            Some(self.rope.len())
        } else {
            Some(self.rope.offset_of_line(line + 1) - 1)
        }
    }

    /// Text of `line` without its newline.
    pub fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        let start = self.line_start(line)?;
        let end = self.line_end(line)?;
        Some(self.rope.slice_to_cow(start..end))
    }

    /// Length of `line` in chars; zero for lines past the end.
    pub fn line_len(&self, line: usize) -> usize {
        self.line(line).map_or(0, |text| text.chars().count())
    }

    /// Convert a position to a byte offset. Columns past the end of the line
    /// are clipped to the line end.
    pub fn offset_of(&self, pos: Position) -> Result<usize> {
        let start = self.line_start(pos.line).ok_or(EditorError::InvalidPosition {
            line: pos.line,
            ch: pos.ch,
        })?;
        let text = self.line(pos.line).unwrap_or_default();
        let byte = text
            .char_indices()
            .nth(pos.ch)
            .map_or(text.len(), |(i, _)| i);
        Ok(start + byte)
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to it.
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len());
        let line = self.rope.line_of_offset(offset);
        let start = self.rope.offset_of_line(line);
        let ch = self.rope.slice_to_cow(start..offset).chars().count();
        Position { line, ch }
    }

    /// Clamp a position into the buffer.
    pub fn clip(&self, pos: Position) -> Position {
        let last = self.line_count() - 1;
        if pos.line > last {
            return Position::new(last, self.line_len(last));
        }
        Position::new(pos.line, pos.ch.min(self.line_len(pos.line)))
    }

    /// Slice the buffer, clamping the range to the document bounds.
    pub fn slice(&self, range: std::ops::Range<usize>) -> Cow<'_, str> {
        let len = self.rope.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.rope.slice_to_cow(start..end)
    }

    /// Char at a position, if any.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line)?.chars().nth(pos.ch)
    }

    /// Build a delta replacing `range` with `text`.
    pub fn edit_delta(&self, range: std::ops::Range<usize>, text: &str) -> Delta<RopeInfo> {
        let mut builder = Builder::new(self.rope.len());
        if text.is_empty() {
            builder.delete(range);
        } else {
            builder.replace(range, Rope::from(text));
        }
        builder.build()
    }

    pub(crate) fn apply(&mut self, delta: &Delta<RopeInfo>) {
        self.rope = delta.apply(&self.rope);
    }
}

/// Fold `\r\n` and lone `\r` into `\n`.
pub(crate) fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
