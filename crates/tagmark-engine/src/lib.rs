//! Rich-text annotation engine.
//!
//! A [`Document`] keeps inline styles, heading classes and lists over a
//! line-oriented rope buffer, and converts that model to and from a small
//! tagged markup vocabulary.

pub mod editing;
pub mod error;
pub mod markup;
pub mod state;

pub use editing::{
    ActiveBlock, BlockClass, Cmd, Command, DEFAULT_BULLET, Document, Event, EventKind,
    InlineClass, Keymap, ListKind, Origin, Position, Range, Selection,
};
pub use error::{EditorError, Result};
pub use markup::{DEFAULT_LINE_BREAK, FormatRegistry, MarkdownConverter, PulldownConverter, TagMap};
pub use state::{DocumentState, Marker};
