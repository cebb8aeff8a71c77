use serde::{Deserialize, Serialize};

/// A `(line, ch)` location in the buffer.
///
/// `ch` counts chars within the line, not bytes. The derived ordering is
/// lexicographic: line first, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub const fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, ch): (usize, usize)) -> Self {
        Self { line, ch }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.ch)
    }
}

/// A span between two positions, always stored with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Build a range from two endpoints in either order.
    pub fn new(a: impl Into<Position>, b: impl Into<Position>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn collapsed(at: impl Into<Position>) -> Self {
        let at = at.into();
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Line indices touched by this range.
    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start.line..=self.end.line
    }

    /// Column span of this range on `line`, given that line's length.
    ///
    /// The first line starts at `start.ch`, the last ends at `end.ch`, and
    /// any line in between is covered whole.
    pub fn columns_on(&self, line: usize, line_len: usize) -> (usize, usize) {
        let s = if line == self.start.line {
            self.start.ch
        } else {
            0
        };
        let e = if line == self.end.line {
            self.end.ch
        } else {
            line_len
        };
        (s, e)
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A selection with a fixed anchor and a moving head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: impl Into<Position>, head: impl Into<Position>) -> Self {
        Self {
            anchor: anchor.into(),
            head: head.into(),
        }
    }

    pub fn cursor(at: impl Into<Position>) -> Self {
        let at = at.into();
        Self {
            anchor: at,
            head: at,
        }
    }

    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case((0, 5), (1, 0), true)]
    #[case((1, 0), (1, 3), true)]
    #[case((2, 0), (1, 9), false)]
    #[case((1, 1), (1, 1), false)]
    fn positions_order_by_line_then_column(
        #[case] a: (usize, usize),
        #[case] b: (usize, usize),
        #[case] less: bool,
    ) {
        assert_eq!(Position::from(a) < Position::from(b), less);
    }

    #[test]
    fn range_normalises_reversed_endpoints() {
        let range = Range::new((1, 2), (0, 4));
        assert_eq!(range.start, Position::new(0, 4));
        assert_eq!(range.end, Position::new(1, 2));
        assert!(!range.is_collapsed());
    }

    #[test]
    fn columns_on_each_line() {
        let range = Range::new((0, 1), (2, 2));
        assert_eq!(range.columns_on(0, 7), (1, 7));
        assert_eq!(range.columns_on(1, 4), (0, 4));
        assert_eq!(range.columns_on(2, 10), (0, 2));
    }

    #[test]
    fn selection_range_is_ordered() {
        let selection = Selection::new((2, 0), (1, 4));
        assert_eq!(selection.range(), Range::new((1, 4), (2, 0)));
        assert!(!selection.is_collapsed());
        assert!(Selection::cursor((0, 3)).is_collapsed());
    }

    #[test]
    fn position_serializes_as_line_ch() {
        let json = serde_json::to_string(&Position::new(3, 1)).unwrap();
        assert_eq!(json, r#"{"line":3,"ch":1}"#);
    }
}
