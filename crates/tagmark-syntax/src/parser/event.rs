//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree building.
//! Instead of building the tree directly, the parser emits a **flat sequence**
//! of events that describe the tree structure:
//!
//! ```text
//! Start(ELEMENT)
//!   Start(START_TAG)
//!     Token(LT)
//!     Token(NAME)
//!     Token(GT)
//!   Finish
//!   Token(NAME)          ← element content
//!   Start(END_TAG)
//!     Token(LT_SLASH)
//!     Token(NAME)
//!     Token(GT)
//!   Finish
//! Finish
//! ```
//!
//! The Sink processes these in order, maintaining a stack of open nodes.
//! Start pushes, Finish pops.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
///
/// Events form a flat representation of the tree that the [`Sink`](super::sink::Sink)
/// converts into an actual Rowan tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node of the given kind.
    Start { kind: SyntaxKind },

    /// Add the next lexer token to the current node.
    Token { kind: SyntaxKind },

    /// Finish the current node. Paired with a preceding `Start`.
    Finish,

    /// A reserved slot for a node that may or may not be created.
    ///
    /// `parser.start()` pushes one; `marker.complete()` turns it into a
    /// `Start`, `marker.abandon()` leaves it inert.
    Placeholder,
}

impl Event {
    /// Create a start event.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    /// Create a token event.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
