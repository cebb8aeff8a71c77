//! Class names carried by marks and lines.
//!
//! Names round-trip through `FromStr`/`Display` as the lowercase strings
//! used in persisted state (`"bold"`, `"ordered"`, `"h2"`, ...).

use std::fmt;
use std::str::FromStr;

use crate::error::EditorError;

/// Inline styles a mark can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InlineClass {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Annotation,
}

impl InlineClass {
    pub const ALL: [InlineClass; 5] = [
        InlineClass::Bold,
        InlineClass::Italic,
        InlineClass::Underline,
        InlineClass::Strikethrough,
        InlineClass::Annotation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InlineClass::Bold => "bold",
            InlineClass::Italic => "italic",
            InlineClass::Underline => "underline",
            InlineClass::Strikethrough => "strikethrough",
            InlineClass::Annotation => "annotation",
        }
    }
}

/// Kind of a list line, carried by its sentinel mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Ordered => "ordered",
            ListKind::Unordered => "unordered",
        }
    }

    /// Container element for a group of this kind.
    pub fn container_tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

/// Class of a stored mark: an inline style or a list sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkClass {
    Inline(InlineClass),
    List(ListKind),
}

impl MarkClass {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkClass::Inline(class) => class.as_str(),
            MarkClass::List(kind) => kind.as_str(),
        }
    }

    pub fn inline(self) -> Option<InlineClass> {
        match self {
            MarkClass::Inline(class) => Some(class),
            MarkClass::List(_) => None,
        }
    }

    pub fn list(self) -> Option<ListKind> {
        match self {
            MarkClass::List(kind) => Some(kind),
            MarkClass::Inline(_) => None,
        }
    }
}

/// Block class assigned to a whole line: a heading level `h1`..`h6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockClass(u8);

impl BlockClass {
    /// Heading of `level` 1 through 6.
    pub fn heading(level: u8) -> Option<Self> {
        (1..=6).contains(&level).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn tag(self) -> String {
        format!("h{}", self.0)
    }
}

fn unknown(kind: &str, name: &str) -> EditorError {
    EditorError::InvalidFormat(format!("unknown {kind} class `{name}`"))
}

impl FromStr for InlineClass {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InlineClass::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| unknown("inline", s))
    }
}

impl FromStr for ListKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ordered" => Ok(ListKind::Ordered),
            "unordered" => Ok(ListKind::Unordered),
            _ => Err(unknown("list", s)),
        }
    }
}

impl FromStr for BlockClass {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('h')
            .and_then(|level| level.parse::<u8>().ok())
            .and_then(BlockClass::heading)
            .ok_or_else(|| unknown("block", s))
    }
}

impl fmt::Display for InlineClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MarkClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BlockClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}
