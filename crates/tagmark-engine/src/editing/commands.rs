use xi_rope::{Delta, RopeInfo};

use crate::editing::{Buffer, Position, Range};
use crate::error::Result;

/// Edit commands. Every buffer change goes through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: Position, text: String },
    DeleteRange { range: Range },
    ReplaceRange { range: Range, text: String },
}

/// Where an edit came from. Observers and the list reactions key off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Typed text, including `"\n"` from Enter
    Input,
    Delete,
    Paste,
    /// Whole-document replacement
    SetValue,
    /// Sentinel insertion or removal by the list engine
    Structural,
    Undo,
    Redo,
}

impl Origin {
    /// Edits the undo history records directly.
    pub fn is_user(self) -> bool {
        matches!(self, Origin::Input | Origin::Delete | Origin::Paste)
    }
}

/// A command resolved against the buffer it will be applied to.
#[derive(Debug)]
pub(crate) struct Compiled {
    pub delta: Delta<RopeInfo>,
    /// Replaced byte range, pre-edit
    pub replaced: std::ops::Range<usize>,
    pub text: String,
    pub from: Position,
    pub to: Position,
}

pub(crate) fn compile_command(buffer: &Buffer, cmd: &Cmd) -> Result<Compiled> {
    let (range, text) = match cmd {
        Cmd::InsertText { at, text } => (Range::collapsed(*at), text.as_str()),
        Cmd::DeleteRange { range } => (*range, ""),
        Cmd::ReplaceRange { range, text } => (*range, text.as_str()),
    };
    let start = buffer.offset_of(range.start)?;
    let end = buffer.offset_of(range.end)?;
    compile_bytes(buffer, start..end, text)
}

/// Compile a replacement of a byte range, clamped to the buffer.
pub(crate) fn compile_bytes(
    buffer: &Buffer,
    replaced: std::ops::Range<usize>,
    text: &str,
) -> Result<Compiled> {
    let end = replaced.end.min(buffer.len());
    let replaced = replaced.start.min(end)..end;
    let text = crate::editing::buffer::normalize_newlines(text).into_owned();
    let delta = buffer.edit_delta(replaced.clone(), &text);
    Ok(Compiled {
        delta,
        from: buffer.position_of(replaced.start),
        to: buffer.position_of(replaced.end),
        replaced,
        text,
    })
}

/// Byte ranges of inserted text in post-edit coordinates.
pub(crate) fn changed_ranges(delta: &Delta<RopeInfo>) -> Vec<std::ops::Range<usize>> {
    let mut changed = Vec::new();
    let mut cursor = 0;
    for op in delta.els.iter() {
        match op {
            xi_rope::delta::DeltaElement::Copy(from, to) => {
                cursor += to - from;
            }
            xi_rope::delta::DeltaElement::Insert(inserted) => {
                let start = cursor;
                let end = cursor + inserted.len();
                changed.push(start..end);
                cursor = end;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // xi-rope only defines `apply_to_string` under its own `cfg(test)`.
    trait ApplyToString {
        fn apply_to_string(&self, s: &str) -> String;
    }

    impl ApplyToString for xi_rope::Delta<xi_rope::RopeInfo> {
        fn apply_to_string(&self, s: &str) -> String {
            String::from(self.apply(&xi_rope::Rope::from(s)))
        }
    }

    #[test]
    fn test_insert_compiles_at_position() {
        let buffer = Buffer::new("ab\ncd");
        let compiled = compile_command(
            &buffer,
            &Cmd::InsertText {
                at: Position::new(1, 1),
                text: "X".into(),
            },
        )
        .unwrap();
        assert_eq!(compiled.replaced, 4..4);
        assert_eq!(compiled.delta.apply_to_string("ab\ncd"), "ab\ncXd");
        assert_eq!(changed_ranges(&compiled.delta), vec![4..5]);
    }

    #[test]
    fn test_delete_across_lines() {
        let buffer = Buffer::new("ab\ncd");
        let compiled = compile_command(
            &buffer,
            &Cmd::DeleteRange {
                range: Range::new((0, 1), (1, 1)),
            },
        )
        .unwrap();
        assert_eq!(compiled.from, Position::new(0, 1));
        assert_eq!(compiled.to, Position::new(1, 1));
        assert_eq!(compiled.delta.apply_to_string("ab\ncd"), "ad");
        assert!(changed_ranges(&compiled.delta).is_empty());
    }

    #[test]
    fn test_replace_normalizes_newlines() {
        let buffer = Buffer::new("abc");
        let compiled = compile_command(
            &buffer,
            &Cmd::ReplaceRange {
                range: Range::new((0, 1), (0, 2)),
                text: "x\r\ny".into(),
            },
        )
        .unwrap();
        assert_eq!(compiled.text, "x\ny");
        assert_eq!(compiled.delta.apply_to_string("abc"), "ax\nyc");
    }

    #[test]
    fn test_missing_line_is_rejected() {
        let buffer = Buffer::new("abc");
        let err = compile_command(
            &buffer,
            &Cmd::InsertText {
                at: Position::new(3, 0),
                text: "x".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::EditorError::InvalidPosition { line: 3, .. }
        ));
    }
}
